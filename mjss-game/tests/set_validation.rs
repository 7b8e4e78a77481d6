use mjss_game::{
    ErrorAction, ErrorPolicy, GameScore, GameValidationError, PlayerScore, Seat, SetScore,
    Tolerance, ToleratedViolation, ViolationKind, classify,
};

fn seated(points: [i64; 4]) -> GameScore {
    GameScore::new(
        ["east-player", "south-player", "west-player", "north-player"]
            .into_iter()
            .zip(Seat::ALL)
            .zip(points)
            .map(|((player, seat), point)| PlayerScore::new(player, point, Some(seat)))
            .collect(),
    )
}

/// A set whose second game repeats a player and whose third misses a point.
fn flawed_set(policy_for_sum: ErrorAction) -> SetScore {
    let clean = seated([25, 5, -10, -20]);

    let mut repeated = seated([10, 0, -5, -5]);
    repeated.result[1].player = "east-player".to_string();
    let repeated = repeated.with_known_errors(
        ErrorPolicy::new().with(ViolationKind::NotFourPlayers, ErrorAction::Drop),
    );

    let short_sum = seated([10, 0, -5, -4])
        .with_known_errors(ErrorPolicy::new().with(ViolationKind::NonZeroSum, policy_for_sum));

    SetScore::new(None, vec![clean, repeated, short_sum])
}

#[test]
fn exact_declarations_validate_and_record_tolerance() {
    let validated = flawed_set(ErrorAction::Resume).validate().unwrap();
    assert_eq!(
        validated.diagnostics(),
        vec![
            ToleratedViolation {
                game_index: 1,
                kind: ViolationKind::NotFourPlayers,
                tolerance: Tolerance::Drop,
            },
            ToleratedViolation {
                game_index: 2,
                kind: ViolationKind::NonZeroSum,
                tolerance: Tolerance::Resume,
            },
        ]
    );
    assert!(validated.games()[0].tolerated().is_empty());
}

#[test]
fn raising_one_declaration_fails_the_set() {
    let err = flawed_set(ErrorAction::Raise).validate().unwrap_err();
    assert_eq!(err.game_index, 2);
    assert_eq!(
        err.source,
        GameValidationError::Raised {
            kind: ViolationKind::NonZeroSum
        }
    );
}

#[test]
fn extra_declaration_fails_as_not_found() {
    let mut set = flawed_set(ErrorAction::Resume);
    set.scores[0] = set.scores[0]
        .clone()
        .with_known_errors(ErrorPolicy::new().with(ViolationKind::SeatsMismatch, ErrorAction::Drop));
    let err = set.validate().unwrap_err();
    assert_eq!(err.game_index, 0);
    assert_eq!(
        err.source,
        GameValidationError::ExpectedNotFound {
            kind: ViolationKind::SeatsMismatch
        }
    );
    assert!(err.to_string().contains("expected violation not found: seats mismatch"));
}

#[test]
fn first_failure_aborts_the_set() {
    let mut set = flawed_set(ErrorAction::Resume);
    set.scores[1].known_errors = ErrorPolicy::new();
    set.scores[2].known_errors = ErrorPolicy::new();
    let err = set.validate().unwrap_err();
    assert_eq!(err.game_index, 1);
    assert_eq!(err.source.kind(), ViolationKind::NotFourPlayers);
    assert!(err.to_string().starts_with("undated[1]:"));
}

#[test]
fn clean_games_never_report_violations() {
    let samples = [[0, 0, 0, 0], [40, -10, -10, -20], [1, -1, 2, -2], [-300, 100, 100, 100]];
    for points in samples {
        assert!(classify(&seated(points)).is_empty(), "{points:?}");
        let mut blind = seated(points);
        for entry in &mut blind.result {
            entry.seat = None;
        }
        assert!(classify(&blind).is_empty(), "{points:?} without seats");
    }
}

#[test]
fn nonzero_sum_reported_regardless_of_other_rules() {
    let samples = [[1, 0, 0, 0], [-1, 0, 0, 0], [30, 10, -10, -29]];
    for points in samples {
        let mut game = seated(points);
        assert!(classify(&game).contains(&ViolationKind::NonZeroSum));
        game.result[0].seat = None;
        game.result[1].player = game.result[2].player.clone();
        assert!(classify(&game).contains(&ViolationKind::NonZeroSum));
    }
}
