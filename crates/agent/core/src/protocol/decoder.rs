//! Snapshot decoding: status listings and grid dumps into world mutations.
//!
//! Both entry points stage their changes on a clone of the world model and
//! commit only on success, so a response that fails halfway never leaves a
//! partially applied update behind.
//!
//! # Status listings
//!
//! `OK LONG` followed by tagged lines. Fields alternate `key=value` tokens
//! separated by spaces and equals signs; after splitting on both, the
//! positional indices are fixed per tag:
//!
//! ```text
//! GA: name=<id>     state=<phase> size=<n>
//! ME: symbol=<ch>   name=<id>     team=<t> loyalty=<l> energy=<e> score=<s>
//! PL: symbol=<ch>   name=<id>     team=<t> x=<x> y=<y> state=<status>
//! ```
//!
//! # Grid dumps
//!
//! `OK LONG`, the raw character rows, and a trailing control line. The
//! block replaces the whole occupancy grid; entity coordinates are read
//! straight off the cells.
//!
//! # Movement inference
//!
//! When a tracked enemy's coordinates jump by more than one cell between
//! snapshots, the gap is bridged with unit steps that resolve the full
//! horizontal delta before the vertical delta. The reconstruction is an
//! approximation of the unseen path for the opponent model, never ground
//! truth.

use crate::state::{
    Direction, FlagPair, MatchPhase, MatchState, OccupancyGrid, Peer, PlayerStatus, Position,
    Symbol, SymbolOwner, TeamId, glyph,
};

use super::command::tokens;
use super::error::DecodeError;

/// Applies a `STATUS` listing to the world model.
pub fn apply_status(state: &mut MatchState, response: &[String]) -> Result<(), DecodeError> {
    let mut next = state.clone();
    decode_status(&mut next, response)?;
    *state = next;
    Ok(())
}

/// Applies a `LOOK` grid dump to the world model.
pub fn apply_look(state: &mut MatchState, response: &[String]) -> Result<(), DecodeError> {
    let mut next = state.clone();
    decode_look(&mut next, response)?;
    *state = next;
    Ok(())
}

/// Bridges a coordinate jump with unit steps, horizontal delta first.
pub fn unit_steps(from: Position, to: Position) -> Vec<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut steps = Vec::with_capacity((dx.unsigned_abs() + dy.unsigned_abs()) as usize);

    let horizontal = if dx > 0 { Direction::East } else { Direction::West };
    for _ in 0..dx.unsigned_abs() {
        steps.push(horizontal);
    }
    let vertical = if dy > 0 { Direction::South } else { Direction::North };
    for _ in 0..dy.unsigned_abs() {
        steps.push(vertical);
    }

    steps
}

fn expect_long(response: &[String]) -> Result<(), DecodeError> {
    let first = response.first().ok_or(DecodeError::EmptyResponse)?;
    if first != tokens::LONG {
        return Err(DecodeError::MalformedSnapshot {
            expected: tokens::LONG,
            got: first.clone(),
        });
    }
    Ok(())
}

/// Splits a tagged line on spaces and equals signs, dropping empty tokens.
///
/// All positional field layouts in the protocol are defined over this
/// tokenization, including the `team=`/`loyalty=` pair in join replies.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split([' ', '='])
        .filter(|token| !token.is_empty())
        .collect()
}

fn field<'a>(parts: &[&'a str], index: usize, line: &str) -> Result<&'a str, DecodeError> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| DecodeError::TruncatedLine {
            line: line.to_owned(),
        })
}

fn symbol_field(token: &str) -> Result<Symbol, DecodeError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Symbol(ch)),
        _ => Err(DecodeError::InvalidSymbol {
            value: token.to_owned(),
        }),
    }
}

fn number_field(field: &'static str, token: &str) -> Result<i64, DecodeError> {
    token.parse().map_err(|_| DecodeError::InvalidNumber {
        field,
        value: token.to_owned(),
    })
}

fn status_field(token: &str) -> Result<PlayerStatus, DecodeError> {
    PlayerStatus::from_wire(token).ok_or_else(|| DecodeError::UnknownToken {
        field: "state",
        value: token.to_owned(),
    })
}

fn decode_status(next: &mut MatchState, response: &[String]) -> Result<(), DecodeError> {
    expect_long(response)?;

    for line in &response[1..] {
        if line.starts_with("GA:") {
            decode_game_line(next, line)?;
        } else if line.starts_with("ME:") {
            decode_self_line(next, line)?;
        } else if line.starts_with("PL:") {
            decode_peer_line(next, line)?;
        }
    }

    Ok(())
}

fn decode_game_line(next: &mut MatchState, line: &str) -> Result<(), DecodeError> {
    let parts = split_fields(line);
    next.name = Some(field(&parts, 2, line)?.to_owned());
    let phase_token = field(&parts, 4, line)?;
    next.phase = MatchPhase::from_wire(phase_token).ok_or_else(|| DecodeError::UnknownToken {
        field: "phase",
        value: phase_token.to_owned(),
    })?;
    next.declared_size = Some(field(&parts, 6, line)?.to_owned());
    Ok(())
}

fn decode_self_line(next: &mut MatchState, line: &str) -> Result<(), DecodeError> {
    let parts = split_fields(line);
    next.me.symbol = Some(symbol_field(field(&parts, 2, line)?)?);
    next.me.name = field(&parts, 4, line)?.to_owned();
    next.me.team = Some(TeamId(field(&parts, 6, line)?.to_owned()));
    next.me.loyalty = Some(TeamId(field(&parts, 8, line)?.to_owned()));
    next.me.energy = number_field("energy", field(&parts, 10, line)?)?;
    next.me.score = number_field("score", field(&parts, 12, line)?)?;
    Ok(())
}

fn decode_peer_line(next: &mut MatchState, line: &str) -> Result<(), DecodeError> {
    let parts = split_fields(line);
    let symbol = symbol_field(field(&parts, 2, line)?)?;
    let name = field(&parts, 4, line)?;
    let team = TeamId(field(&parts, 6, line)?.to_owned());
    let x = number_field("x", field(&parts, 8, line)?)? as i32;
    let y = number_field("y", field(&parts, 10, line)?)? as i32;
    let status = status_field(field(&parts, 12, line)?)?;
    let position = Position::new(x, y);

    match next.resolve(symbol.0) {
        SymbolOwner::Me => next.place_me(position, Some(status))?,
        SymbolOwner::Ally => next.place_ally(symbol.0, position, Some(status))?,
        SymbolOwner::Enemy => {
            // Log the inferred path before the coordinates are overwritten.
            if let Some(peer) = next.enemies.get_mut(&symbol.0) {
                if let Some(previous) = peer.position {
                    peer.log_movement(unit_steps(previous, position));
                }
            }
            next.place_enemy(symbol.0, position, Some(status))?;
        }
        SymbolOwner::Unknown => {
            // First sighting through a status line: the peer exists with
            // coordinates but claims no grid cell until the next dump.
            let mut peer = Peer::sighted(symbol, name, team);
            peer.position = Some(position);
            peer.status = status;
            next.observe_new_peer(peer);
        }
    }

    Ok(())
}

fn decode_look(next: &mut MatchState, response: &[String]) -> Result<(), DecodeError> {
    expect_long(response)?;

    // Strip the acknowledgement and the trailing control line.
    if response.len() < 3 {
        return Err(DecodeError::State(crate::state::StateError::EmptyGrid));
    }
    let rows: Vec<Vec<char>> = response[1..response.len() - 1]
        .iter()
        .map(|row| row.chars().collect())
        .collect();

    let grid = OccupancyGrid::from_rows(&rows)?;
    let first_observation = next.occupancy.is_none();

    for (y, row) in rows.iter().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            let position = Position::new(x as i32, y as i32);
            match next.resolve(ch) {
                SymbolOwner::Me => next.me.position = Some(position),
                SymbolOwner::Ally => {
                    if let Some(peer) = next.allies.get_mut(&ch) {
                        peer.position = Some(position);
                    }
                }
                SymbolOwner::Enemy => {
                    if let Some(peer) = next.enemies.get_mut(&ch) {
                        if !first_observation {
                            if let Some(previous) = peer.position {
                                peer.log_movement(unit_steps(previous, position));
                            }
                        }
                        peer.position = Some(position);
                    }
                }
                SymbolOwner::Unknown => {}
            }
        }
    }

    // The dump is authoritative: it both seeds the grid dimensions on the
    // first observation and replaces the occupancy wholesale afterwards.
    if next.flags.is_none() {
        if let (Some(own), Some(lower), Some(upper)) = (
            next.me.symbol,
            grid.find(glyph::FLAG_LOWER),
            grid.find(glyph::FLAG_UPPER),
        ) {
            next.flags = Some(FlagPair::resolve(own, lower, upper));
        }
    }
    next.occupancy = Some(grid);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_response() -> Vec<String> {
        [
            "OK LONG",
            "GA: name=room1 state=ACTIVE size=8",
            "ME: symbol=A name=karen team=0 loyalty=0 energy=100 score=3",
            "PL: symbol=A name=karen team=0 x=1 y=1 state=ACTIVE",
            "PL: symbol=B name=mate team=0 x=3 y=1 state=ACTIVE",
            "PL: symbol=c name=rival team=1 x=5 y=5 state=ACTIVE",
        ]
        .iter()
        .map(|line| line.to_string())
        .collect()
    }

    fn look_response(rows: &[&str]) -> Vec<String> {
        let mut response = vec!["OK LONG".to_string()];
        response.extend(rows.iter().map(|row| row.to_string()));
        response.push("ENDOFLONG".to_string());
        response
    }

    #[test]
    fn rejects_missing_acknowledgement() {
        let mut state = MatchState::new("karen");
        let response = vec!["ERROR 404 Game not found".to_string()];

        let before = state.clone();
        let err = apply_status(&mut state, &response).unwrap_err();

        assert!(matches!(err, DecodeError::MalformedSnapshot { .. }));
        // The stale model is retained untouched.
        assert_eq!(state.me.name, before.me.name);
        assert!(state.allies.is_empty());
    }

    #[test]
    fn status_listing_populates_match_self_and_peers() {
        let mut state = MatchState::new("karen");
        apply_status(&mut state, &status_response()).unwrap();

        assert_eq!(state.name.as_deref(), Some("room1"));
        assert_eq!(state.phase, MatchPhase::Active);
        assert_eq!(state.me.symbol, Some(Symbol('A')));
        assert_eq!(state.me.energy, 100);
        assert_eq!(state.me.score, 3);
        assert_eq!(state.me.position, Some(Position::new(1, 1)));
        assert!(state.allies.contains_key(&'B'));
        assert!(state.enemies.contains_key(&'c'));
        assert_eq!(
            state.enemies[&'c'].position,
            Some(Position::new(5, 5))
        );
    }

    #[test]
    fn repeated_identical_status_is_idempotent() {
        let mut once = MatchState::new("karen");
        apply_status(&mut once, &status_response()).unwrap();

        let mut twice = once.clone();
        apply_status(&mut twice, &status_response()).unwrap();

        assert_eq!(once.me.position, twice.me.position);
        assert_eq!(once.allies, twice.allies);
        // A second identical listing must not fabricate movement.
        assert!(twice.enemies[&'c'].movement_log.is_empty());
    }

    #[test]
    fn enemy_delta_is_logged_before_coordinates_change() {
        let mut state = MatchState::new("karen");
        apply_status(&mut state, &status_response()).unwrap();

        let moved: Vec<String> = [
            "OK LONG",
            "PL: symbol=c name=rival team=1 x=7 y=6 state=ACTIVE",
        ]
        .iter()
        .map(|line| line.to_string())
        .collect();
        apply_status(&mut state, &moved).unwrap();

        let rival = &state.enemies[&'c'];
        assert_eq!(rival.position, Some(Position::new(7, 6)));
        assert_eq!(
            rival.movement_log,
            vec![Direction::East, Direction::East, Direction::South]
        );
    }

    #[test]
    fn occupancy_tracks_entities_after_status_patch() {
        let mut state = MatchState::new("karen");
        state.me.symbol = Some(Symbol('A'));
        state.me.team = Some(TeamId("0".into()));
        apply_look(
            &mut state,
            &look_response(&["A.......", "........", "...c....", "........"]),
        )
        .unwrap();
        apply_status(
            &mut state,
            &[
                "OK LONG".to_string(),
                "PL: symbol=A name=karen team=0 x=2 y=0 state=ACTIVE".to_string(),
            ],
        )
        .unwrap();

        let grid = state.occupancy.as_ref().unwrap();
        assert_eq!(state.me.position, Some(Position::new(2, 0)));
        assert_eq!(grid.get(Position::new(2, 0)), Some('A'));
        assert_eq!(grid.get(Position::new(0, 0)), Some('.'));
        assert_eq!(grid.positions_of('A').count(), 1);
    }

    #[test]
    fn first_look_resolves_flags_by_symbol_case() {
        let mut state = MatchState::new("karen");
        state.me.symbol = Some(Symbol('A'));

        apply_look(
            &mut state,
            &look_response(&[
                "............",
                "...x......X.",
                "A...........",
            ]),
        )
        .unwrap();

        let flags = state.flags.unwrap();
        assert_eq!(flags.wanted, Position::new(10, 1));
        assert_eq!(flags.defended, Position::new(3, 1));
        assert_eq!(state.grid_size(), Some((12, 3)));
    }

    #[test]
    fn flags_are_resolved_only_once() {
        let mut state = MatchState::new("karen");
        state.me.symbol = Some(Symbol('a'));

        apply_look(&mut state, &look_response(&["x...X", "a...."])).unwrap();
        let first = state.flags.unwrap();

        // Later dumps never re-orient the pair.
        apply_look(&mut state, &look_response(&["X...x", "a...."])).unwrap();
        assert_eq!(state.flags.unwrap(), first);
    }

    #[test]
    fn look_infers_enemy_movement_except_on_first_observation() {
        let mut state = MatchState::new("karen");
        state.me.symbol = Some(Symbol('A'));
        state.me.team = Some(TeamId("0".into()));
        let mut rival = Peer::sighted(Symbol('c'), "rival", TeamId("1".into()));
        rival.position = Some(Position::new(0, 0));
        state.observe_new_peer(rival);

        // First dump: no inference even though coordinates changed.
        apply_look(&mut state, &look_response(&["A....", "...c."])).unwrap();
        assert!(state.enemies[&'c'].movement_log.is_empty());

        // Second dump: the one-cell jump becomes a unit step.
        apply_look(&mut state, &look_response(&["A....", "....c"])).unwrap();
        assert_eq!(state.enemies[&'c'].movement_log, vec![Direction::East]);
    }

    #[test]
    fn unit_steps_compose_to_the_net_displacement() {
        let cases = [
            (Position::new(0, 0), Position::new(3, 0)),
            (Position::new(5, 5), Position::new(2, 9)),
            (Position::new(7, 3), Position::new(7, 3)),
            (Position::new(0, 9), Position::new(9, 0)),
        ];

        for (from, to) in cases {
            let steps = unit_steps(from, to);
            let reached = steps.iter().fold(from, |pos, step| pos.step(*step));
            assert_eq!(reached, to, "steps from {from} to {to} must compose");
            assert_eq!(steps.len() as u32, from.manhattan(to));
        }
    }

    #[test]
    fn unit_steps_resolve_horizontal_before_vertical() {
        let steps = unit_steps(Position::new(0, 0), Position::new(2, 2));
        assert_eq!(
            steps,
            vec![
                Direction::East,
                Direction::East,
                Direction::South,
                Direction::South
            ]
        );
    }
}
