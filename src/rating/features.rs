use crate::grid::Hexagon;

/// One value per rating dimension.
///
/// The same record holds a hexagon's feature values, a persona's weights and
/// the neighbour damping table, so dimensions line up by name.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    pub road_type_1: f64,
    pub road_type_2: f64,
    pub road_type_3: f64,
    pub road_type_4: f64,
    pub road_type_5: f64,
    pub road_type_6: f64,
    pub road_type_7: f64,
    pub road_type_8: f64,
    pub road_type_9: f64,
    pub avg_speed: f64,
    pub avg_limit: f64,
    pub unique_routes: f64,
    pub stop_count: f64,
    pub pedestrian_roads: f64,
    /// 1 when the dominant pedestrian coverage is asphalt.
    pub asphalt: f64,
    pub parks: f64,
    pub schools: f64,
    pub factories: f64,
    pub hospitals: f64,
    pub shops: f64,
}

impl FeatureVector {
    pub const ZERO: Self = Self {
        road_type_1: 0.0,
        road_type_2: 0.0,
        road_type_3: 0.0,
        road_type_4: 0.0,
        road_type_5: 0.0,
        road_type_6: 0.0,
        road_type_7: 0.0,
        road_type_8: 0.0,
        road_type_9: 0.0,
        avg_speed: 0.0,
        avg_limit: 0.0,
        unique_routes: 0.0,
        stop_count: 0.0,
        pedestrian_roads: 0.0,
        asphalt: 0.0,
        parks: 0.0,
        schools: 0.0,
        factories: 0.0,
        hospitals: 0.0,
        shops: 0.0,
    };

    pub fn to_array(&self) -> [f64; 20] {
        [
            self.road_type_1, self.road_type_2, self.road_type_3, self.road_type_4,
            self.road_type_5, self.road_type_6, self.road_type_7, self.road_type_8,
            self.road_type_9, self.avg_speed, self.avg_limit, self.unique_routes,
            self.stop_count, self.pedestrian_roads, self.asphalt, self.parks,
            self.schools, self.factories, self.hospitals, self.shops,
        ]
    }

    pub fn from_array(v: [f64; 20]) -> Self {
        Self {
            road_type_1: v[0], road_type_2: v[1], road_type_3: v[2], road_type_4: v[3],
            road_type_5: v[4], road_type_6: v[5], road_type_7: v[6], road_type_8: v[7],
            road_type_9: v[8], avg_speed: v[9], avg_limit: v[10], unique_routes: v[11],
            stop_count: v[12], pedestrian_roads: v[13], asphalt: v[14], parks: v[15],
            schools: v[16], factories: v[17], hospitals: v[18], shops: v[19],
        }
    }

    /// Combine two vectors dimension by dimension.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let (a, b) = (self.to_array(), other.to_array());
        Self::from_array(std::array::from_fn(|i| f(a[i], b[i])))
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.to_array().iter()
            .zip(other.to_array())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Feature values of a hexagon. Missing attributes count as zero.
    pub fn from_hexagon(hexagon: &Hexagon) -> Self {
        let road = |code: &str| f64::from(hexagon.road_type_count(code));
        let count = |n: Option<u32>| n.map_or(0.0, f64::from);
        let value = |x: Option<f64>| x.filter(|v| v.is_finite()).unwrap_or(0.0);

        Self {
            road_type_1: road("1"),
            road_type_2: road("2"),
            road_type_3: road("3"),
            road_type_4: road("4"),
            road_type_5: road("5"),
            road_type_6: road("6"),
            road_type_7: road("7"),
            road_type_8: road("8"),
            road_type_9: road("9"),
            avg_speed: value(hexagon.avg_speed),
            avg_limit: value(hexagon.avg_limit),
            unique_routes: count(hexagon.unique_routes_count),
            stop_count: count(hexagon.stop_count),
            pedestrian_roads: count(hexagon.pedestrian_roads_count),
            asphalt: if hexagon.dominant_coverage_type.as_deref().is_some_and(is_asphalt) { 1.0 } else { 0.0 },
            parks: count(hexagon.count_parks),
            schools: count(hexagon.count_schools),
            factories: count(hexagon.count_factories),
            hospitals: count(hexagon.count_hospitals),
            shops: count(hexagon.count_shops),
        }
    }
}

fn is_asphalt(coverage: &str) -> bool {
    let coverage = coverage.trim().to_lowercase();
    coverage == "асфальт" || coverage == "asphalt"
}

/// How much of each feature of a neighbouring hexagon carries over.
pub const NEIGHBOR_EFFECT: FeatureVector = FeatureVector {
    road_type_1: 0.6,
    road_type_2: 0.6,
    road_type_3: 0.6,
    road_type_4: 0.3,
    unique_routes: 0.5,
    stop_count: 0.5,
    pedestrian_roads: 0.4,
    parks: 0.6,
    schools: 0.5,
    factories: 0.8,
    hospitals: 0.8,
    shops: 0.4,
    ..FeatureVector::ZERO
};
