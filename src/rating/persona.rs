use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// Penalties every persona starts from.
const BASELINE: FeatureVector = FeatureVector {
    factories: -15.0,
    road_type_1: -15.0,
    road_type_2: -10.0,
    road_type_3: -5.0,
    ..FeatureVector::ZERO
};

pub const BUILDER: FeatureVector = FeatureVector {
    road_type_4: 10.0,
    road_type_5: 10.0,
    road_type_6: 10.0,
    road_type_7: 10.0,
    road_type_8: 0.0,
    road_type_9: 10.0,
    unique_routes: 15.0,
    stop_count: 15.0,
    pedestrian_roads: 5.0,
    shops: 20.0,
    hospitals: 20.0,
    schools: 20.0,
    ..BASELINE
};

pub const DRIVER: FeatureVector = FeatureVector {
    road_type_1: -9.0,
    road_type_2: -6.0,
    road_type_3: -3.0,
    road_type_4: 15.0,
    road_type_5: 10.0,
    road_type_6: 5.0,
    road_type_7: 1.0,
    avg_speed: 5.0,
    avg_limit: 0.0,
    unique_routes: 1.0,
    stop_count: 1.0,
    pedestrian_roads: 3.0,
    shops: 5.0,
    hospitals: 8.0,
    asphalt: 20.0,
    ..BASELINE
};

pub const WALKER: FeatureVector = FeatureVector {
    road_type_1: -20.0,
    road_type_2: -15.0,
    road_type_3: -10.0,
    road_type_4: 5.0,
    road_type_5: 5.0,
    road_type_6: 5.0,
    road_type_7: 1.0,
    road_type_8: 0.0,
    road_type_9: 10.0,
    parks: 20.0,
    pedestrian_roads: 40.0,
    shops: 25.0,
    hospitals: 25.0,
    ..BASELINE
};

pub const PUBLIC_TRANSPORT: FeatureVector = FeatureVector {
    stop_count: 20.0,
    unique_routes: 30.0,
    ..BASELINE
};

pub const PARENT: FeatureVector = FeatureVector {
    unique_routes: 15.0,
    stop_count: 15.0,
    pedestrian_roads: 10.0,
    parks: 25.0,
    shops: 25.0,
    hospitals: 25.0,
    schools: 25.0,
    factories: -20.0,
    ..BASELINE
};

pub const PET_OWNER: FeatureVector = FeatureVector {
    unique_routes: 15.0,
    stop_count: 15.0,
    pedestrian_roads: 10.0,
    shops: 25.0,
    parks: 30.0,
    hospitals: 25.0,
    ..BASELINE
};

pub const BIG_FAMILY: FeatureVector = FeatureVector {
    shops: 35.0,
    parks: 30.0,
    hospitals: 25.0,
    ..BASELINE
};

pub const OLD_FAMILY: FeatureVector = FeatureVector {
    parks: 35.0,
    hospitals: 45.0,
    factories: -25.0,
    ..BASELINE
};

/// Whose priorities a rating reflects. Built per request, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub builder: bool,
    pub driver: bool,
    pub uses_public_transport: bool,
    pub parent: bool,
    pub pet_owner: bool,
    pub big_family: bool,
    pub old_family: bool,
}

/// The single-select base profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mobility {
    Builder,
    Driver,
    Walker,
}

impl Mobility {
    pub fn weights(self) -> FeatureVector {
        match self {
            Self::Builder => BUILDER,
            Self::Driver => DRIVER,
            Self::Walker => WALKER,
        }
    }
}

impl Persona {
    /// Builder beats driver beats walker.
    pub fn mobility(&self) -> Mobility {
        if self.builder {
            Mobility::Builder
        } else if self.driver {
            Mobility::Driver
        } else {
            Mobility::Walker
        }
    }

    /// Additional profiles to fold into the base, in fixed order.
    pub fn extras(&self) -> Vec<FeatureVector> {
        [
            (self.uses_public_transport, PUBLIC_TRANSPORT),
            (self.parent, PARENT),
            (self.pet_owner, PET_OWNER),
            (self.big_family, BIG_FAMILY),
            (self.old_family, OLD_FAMILY),
        ]
        .into_iter()
        .filter_map(|(set, weights)| set.then_some(weights))
        .collect()
    }

    /// Weight vector for this persona. A builder ignores every other flag.
    pub fn weights(&self) -> FeatureVector {
        match self.mobility() {
            Mobility::Builder => BUILDER,
            base => blend(base.weights(), &self.extras()),
        }
    }
}

/// Fold `extras` into `base` one dimension at a time: a non-negative running
/// weight can only grow, a negative one can only fall.
pub fn blend(base: FeatureVector, extras: &[FeatureVector]) -> FeatureVector {
    extras.iter().fold(base, |running, extra| {
        running.zip_with(extra, |r, e| if r >= 0.0 { r.max(e) } else { r.min(e) })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_follows_priority() {
        assert_eq!(Persona::default().mobility(), Mobility::Walker);
        assert_eq!(Persona { driver: true, ..Persona::default() }.mobility(), Mobility::Driver);
        assert_eq!(Persona { driver: true, builder: true, ..Persona::default() }.mobility(), Mobility::Builder);
    }

    #[test]
    fn builder_ignores_other_flags() {
        let persona = Persona {
            builder: true,
            driver: true,
            parent: true,
            old_family: true,
            ..Persona::default()
        };
        assert_eq!(persona.weights(), BUILDER);
    }

    #[test]
    fn blend_raises_positives_and_deepens_negatives() {
        let base = FeatureVector { shops: 5.0, parks: 40.0, factories: -15.0, road_type_1: -15.0, ..FeatureVector::ZERO };
        let extra = FeatureVector { shops: 25.0, parks: 10.0, factories: -25.0, road_type_1: 3.0, ..FeatureVector::ZERO };
        let blended = blend(base, &[extra]);

        assert_eq!(blended.shops, 25.0);
        assert_eq!(blended.parks, 40.0);
        assert_eq!(blended.factories, -25.0);
        assert_eq!(blended.road_type_1, -15.0);
    }

    #[test]
    fn zero_weight_is_not_lowered_by_a_penalty() {
        // A zero weight counts as non-negative, so a negative extra cannot lower it.
        let blended = blend(FeatureVector::ZERO, &[FeatureVector { factories: -20.0, ..FeatureVector::ZERO }]);
        assert_eq!(blended.factories, 0.0);
    }

    #[test]
    fn blend_without_extras_is_identity() {
        assert_eq!(blend(DRIVER, &[]), DRIVER);
        assert_eq!(Persona { driver: true, ..Persona::default() }.weights(), DRIVER);
    }

    #[test]
    fn walker_parent_gets_strongest_weights() {
        let weights = Persona { parent: true, old_family: true, ..Persona::default() }.weights();
        assert_eq!(weights.pedestrian_roads, 40.0);
        assert_eq!(weights.schools, 25.0);
        assert_eq!(weights.hospitals, 45.0);
        assert_eq!(weights.factories, -25.0);
        assert_eq!(weights.road_type_1, -20.0);
    }

    #[test]
    fn persona_deserializes_with_missing_flags() {
        let persona: Persona = serde_json::from_str(r#"{"driver": true}"#).unwrap();
        assert_eq!(persona, Persona { driver: true, ..Persona::default() });
    }
}
