//! The fuzzy rule tables, kept as data.
//!
//! Two systems share most of their inputs: the normal-player table weighs
//! flag progress against safety and energy, the impostor table watches its
//! own team instead and only turns on the knife once enough allies are
//! gone. Membership partitions are the standard automatic ones; output
//! bands sit in declaration order on the output scale.

use fuzzy_control::{
    ControlSystem, Condition, FuzzyError, Levels, OutputSpace, Partition, Rule, all, any, term,
};

/// Input variable names shared between the rule tables and sample building.
pub mod input {
    pub const FLAG_DISTANCE: &str = "flag_distance";
    pub const ENEMY_DISTANCE: &str = "enemy_distance";
    pub const ALLY_DISTANCE: &str = "ally_distance";
    pub const SAFE_ZONE: &str = "safe_zone";
    pub const ENERGY: &str = "energy";
    pub const RECHARGE_DISTANCE: &str = "recharge_distance";
    pub const STAGE: &str = "stage";
    pub const ALIVE_ALLIES: &str = "alive_allies";
}

/// Output category names; one band per category.
pub mod category {
    pub const KILL: &str = "go_to_kill";
    pub const FLAG: &str = "go_to_flag";
    pub const RECHARGE: &str = "go_to_recharge";
    pub const SAFE: &str = "stay_safe";
}

/// Domain ceilings for the shared input partitions.
mod domain {
    pub const DISTANCE: f64 = 10.0;
    pub const SAFE_ZONE: f64 = 2.0;
    pub const ENERGY: f64 = 255.0;
    pub const STAGE: f64 = 2.0;
}

fn stage_mid_or_late() -> Condition {
    any([term(input::STAGE, "average"), term(input::STAGE, "good")])
}

fn energy_not_poor() -> Condition {
    any([
        term(input::ENERGY, "mediocre"),
        term(input::ENERGY, "average"),
        term(input::ENERGY, "decent"),
        term(input::ENERGY, "good"),
    ])
}

fn flag_within_reach() -> Condition {
    any([
        term(input::FLAG_DISTANCE, "poor"),
        term(input::FLAG_DISTANCE, "average"),
    ])
}

fn safety_out_of_reach() -> Condition {
    any([
        term(input::SAFE_ZONE, "average"),
        term(input::SAFE_ZONE, "good"),
    ])
}

/// The normal-player rule set.
///
/// `max_flag_distance` bounds the flag-distance universe (the grid
/// diagonal); everything else lives on fixed domains.
pub fn normal_system(max_flag_distance: f64) -> Result<ControlSystem, FuzzyError> {
    let inputs = vec![
        Partition::automatic(
            input::FLAG_DISTANCE,
            0.0,
            max_flag_distance.max(1.0),
            Levels::Three,
        ),
        Partition::automatic(input::ENEMY_DISTANCE, 0.0, domain::DISTANCE, Levels::Three),
        Partition::automatic(input::SAFE_ZONE, 0.0, domain::SAFE_ZONE, Levels::Three),
        Partition::automatic(input::ENERGY, 0.0, domain::ENERGY, Levels::Five),
        Partition::automatic(
            input::RECHARGE_DISTANCE,
            0.0,
            domain::DISTANCE,
            Levels::Three,
        ),
        Partition::automatic(input::STAGE, 0.0, domain::STAGE, Levels::Three),
    ];

    let output = OutputSpace::banded(
        "output",
        0.0,
        40.0,
        &[category::KILL, category::FLAG, category::RECHARGE, category::SAFE],
    );

    // Hunt only from mid-game on, with usable energy, when either safety is
    // out of reach anyway or an enemy is already on top of us.
    let kill = Rule::new(
        any([
            all([
                stage_mid_or_late(),
                energy_not_poor(),
                all([
                    term(input::FLAG_DISTANCE, "good"),
                    term(input::SAFE_ZONE, "good"),
                ]),
            ]),
            all([
                stage_mid_or_late(),
                energy_not_poor(),
                term(input::SAFE_ZONE, "good"),
            ]),
            all([
                stage_mid_or_late(),
                energy_not_poor(),
                term(input::ENEMY_DISTANCE, "poor"),
            ]),
        ]),
        category::KILL,
    );

    // Push the flag when it is near, favoring runs that do not strand us
    // with an empty battery far from any recharge.
    let flag = Rule::new(
        any([
            all([flag_within_reach(), safety_out_of_reach()]),
            all([
                flag_within_reach(),
                any([
                    term(input::ENERGY, "good"),
                    term(input::ENERGY, "average"),
                ]),
                any([
                    term(input::RECHARGE_DISTANCE, "average"),
                    term(input::RECHARGE_DISTANCE, "good"),
                ]),
                safety_out_of_reach(),
            ]),
        ]),
        category::FLAG,
    );

    // Emergency: battery and recharge both poor. Otherwise recharge
    // opportunistically when the flag is far and no enemy presses.
    let recharge = Rule::new(
        any([
            all([
                term(input::ENERGY, "poor"),
                term(input::RECHARGE_DISTANCE, "poor"),
            ]),
            all([
                term(input::ENERGY, "poor"),
                any([
                    term(input::RECHARGE_DISTANCE, "poor"),
                    term(input::RECHARGE_DISTANCE, "average"),
                ]),
                any([
                    term(input::FLAG_DISTANCE, "average"),
                    term(input::FLAG_DISTANCE, "good"),
                ]),
                any([
                    term(input::ENEMY_DISTANCE, "good"),
                    term(input::ENEMY_DISTANCE, "average"),
                ]),
            ]),
        ]),
        category::RECHARGE,
    );

    // Enemy close and a safe cell within immediate reach: take cover.
    let safe = Rule::new(
        all([
            term(input::ENEMY_DISTANCE, "poor"),
            term(input::SAFE_ZONE, "poor"),
        ]),
        category::SAFE,
    );

    ControlSystem::new(inputs, output, vec![kill, flag, recharge, safe])
}

/// The impostor rule set.
///
/// Stays covered while the team is healthy, keeps the battery charged, and
/// hunts the nearest ally once the team has thinned out.
pub fn impostor_system() -> Result<ControlSystem, FuzzyError> {
    let inputs = vec![
        Partition::automatic(input::ALLY_DISTANCE, 0.0, domain::DISTANCE, Levels::Three),
        Partition::automatic(input::ENEMY_DISTANCE, 0.0, domain::DISTANCE, Levels::Three),
        Partition::automatic(input::SAFE_ZONE, 0.0, domain::SAFE_ZONE, Levels::Three),
        Partition::automatic(input::ENERGY, 0.0, domain::ENERGY, Levels::Five),
        Partition::automatic(
            input::RECHARGE_DISTANCE,
            0.0,
            domain::DISTANCE,
            Levels::Three,
        ),
        Partition::automatic(input::STAGE, 0.0, domain::STAGE, Levels::Three),
        Partition::automatic(input::ALIVE_ALLIES, 0.0, 1.0, Levels::Three),
    ];

    let output = OutputSpace::banded(
        "output",
        0.0,
        30.0,
        &[category::KILL, category::RECHARGE, category::SAFE],
    );

    let recharge = Rule::new(
        any([
            all([
                term(input::ENERGY, "poor"),
                term(input::RECHARGE_DISTANCE, "poor"),
            ]),
            all([
                term(input::ENERGY, "poor"),
                any([
                    term(input::RECHARGE_DISTANCE, "poor"),
                    term(input::RECHARGE_DISTANCE, "average"),
                ]),
                any([
                    term(input::ENEMY_DISTANCE, "good"),
                    term(input::ENEMY_DISTANCE, "average"),
                ]),
            ]),
        ]),
        category::RECHARGE,
    );

    // Blend in while most of the team is alive, or whenever cover is right
    // here anyway.
    let safe = Rule::new(
        any([
            term(input::ALIVE_ALLIES, "good"),
            term(input::SAFE_ZONE, "poor"),
        ]),
        category::SAFE,
    );

    let kill = Rule::new(
        all([
            stage_mid_or_late(),
            term(input::ALIVE_ALLIES, "poor"),
            any([
                energy_not_poor(),
                any([
                    term(input::SAFE_ZONE, "good"),
                    term(input::ALLY_DISTANCE, "poor"),
                ]),
            ]),
        ]),
        category::KILL,
    );

    ControlSystem::new(inputs, output, vec![kill, recharge, safe])
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzy_control::Sample;

    #[test]
    fn both_tables_validate() {
        assert!(normal_system(20.0).is_ok());
        assert!(impostor_system().is_ok());
    }

    #[test]
    fn drained_battery_next_to_a_recharge_wins_regardless_of_the_rest() {
        let system = normal_system(20.0).unwrap();
        let sample = Sample::new()
            .with(input::FLAG_DISTANCE, 19.0)
            .with(input::ENEMY_DISTANCE, 10.0)
            .with(input::SAFE_ZONE, 0.0)
            .with(input::ENERGY, 5.0)
            .with(input::RECHARGE_DISTANCE, 1.0)
            .with(input::STAGE, 0.0);

        let verdict = system.evaluate(&sample).unwrap();
        assert_eq!(verdict.band, category::RECHARGE);
    }

    #[test]
    fn close_enemy_with_cover_at_hand_stays_safe() {
        let system = normal_system(20.0).unwrap();
        let sample = Sample::new()
            .with(input::FLAG_DISTANCE, 19.0)
            .with(input::ENEMY_DISTANCE, 0.0)
            .with(input::SAFE_ZONE, 0.0)
            .with(input::ENERGY, 5.0)
            .with(input::RECHARGE_DISTANCE, 9.0)
            .with(input::STAGE, 0.0);

        let verdict = system.evaluate(&sample).unwrap();
        assert_eq!(verdict.band, category::SAFE);
    }

    #[test]
    fn near_flag_with_cover_nearby_goes_for_it() {
        let system = normal_system(20.0).unwrap();
        let sample = Sample::new()
            .with(input::FLAG_DISTANCE, 2.0)
            .with(input::ENEMY_DISTANCE, 10.0)
            .with(input::SAFE_ZONE, 2.0)
            .with(input::ENERGY, 200.0)
            .with(input::RECHARGE_DISTANCE, 9.0)
            .with(input::STAGE, 0.0);

        let verdict = system.evaluate(&sample).unwrap();
        assert_eq!(verdict.band, category::FLAG);
    }

    #[test]
    fn impostor_hunts_once_the_team_thins_out() {
        let system = impostor_system().unwrap();
        let sample = Sample::new()
            .with(input::ALLY_DISTANCE, 1.0)
            .with(input::ENEMY_DISTANCE, 8.0)
            .with(input::SAFE_ZONE, 2.0)
            .with(input::ENERGY, 200.0)
            .with(input::RECHARGE_DISTANCE, 5.0)
            .with(input::STAGE, 2.0)
            .with(input::ALIVE_ALLIES, 0.1);

        let verdict = system.evaluate(&sample).unwrap();
        assert_eq!(verdict.band, category::KILL);
    }

    #[test]
    fn impostor_blends_in_while_the_team_is_healthy() {
        let system = impostor_system().unwrap();
        let sample = Sample::new()
            .with(input::ALLY_DISTANCE, 8.0)
            .with(input::ENEMY_DISTANCE, 8.0)
            .with(input::SAFE_ZONE, 0.0)
            .with(input::ENERGY, 200.0)
            .with(input::RECHARGE_DISTANCE, 5.0)
            .with(input::STAGE, 1.0)
            .with(input::ALIVE_ALLIES, 1.0);

        let verdict = system.evaluate(&sample).unwrap();
        assert_eq!(verdict.band, category::SAFE);
    }
}
