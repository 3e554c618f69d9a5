/// Integration tests for multi-board game flow
///
/// These tests run real board actors through the registry on a paused tokio
/// clock, so turn timeouts, cooldowns, resets and distance checks happen
/// deterministically.
use std::sync::Arc;
use tokio::time::{Duration, sleep};

use drop_four::{
    board::{
        BoardConfig, BoardError, BoardPhase, BoardRegistry, DepartureReason, DropOutcome,
        DropRejection, JoinOutcome, Notice, Resolution,
    },
    game::{Player, Position},
    testing::{Call, Recorder, sample_definition},
};

fn alice() -> Player {
    Player::new(1, "alice")
}

fn bob() -> Player {
    Player::new(2, "bob")
}

fn carol() -> Player {
    Player::new(3, "carol")
}

/// Recorder with every test player standing next to the boards.
fn recorder_with_players() -> Arc<Recorder> {
    let recorder = Recorder::new();
    for id in 1..=3 {
        recorder.set_position(id, Position::new(1.0, 0.0, 1.0));
    }
    recorder
}

fn two_boards(recorder: &Arc<Recorder>) -> BoardRegistry {
    BoardRegistry::spawn(
        vec![sample_definition("north", 8), sample_definition("south", 8)],
        BoardConfig::default(),
        recorder.collaborators(),
    )
    .unwrap()
}

async fn start_game(registry: &BoardRegistry, board: &str) {
    assert_eq!(
        registry.join(board, alice()).await.unwrap(),
        JoinOutcome::Queued { position: 1 }
    );
    assert_eq!(
        registry.join(board, bob()).await.unwrap(),
        JoinOutcome::GameStarted
    );
}

#[tokio::test(start_paused = true)]
async fn test_vertical_win_through_registry() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    start_game(&registry, "north").await;

    for (player, column) in [(1, 1), (2, 2), (1, 1), (2, 2), (1, 1), (2, 2)] {
        let outcome = registry.drop_token("north", player, column).await.unwrap();
        assert!(matches!(
            outcome,
            DropOutcome::Placed {
                resolution: Resolution::NextTurn,
                ..
            }
        ));
        sleep(Duration::from_millis(700)).await;
    }

    let outcome = registry.drop_token("north", 1, 1).await.unwrap();
    let DropOutcome::Placed {
        row: 4,
        resolution: Resolution::Win(result),
        ..
    } = outcome.clone()
    else {
        panic!("expected a win, got {outcome:?}");
    };
    assert_eq!(result.winning_cells, vec![(1, 4), (1, 3), (1, 2), (1, 1)]);

    let north = registry.state("north").await.unwrap();
    assert_eq!(north.phase, BoardPhase::Resolving);
    assert!(north.is_drop_in_progress);

    // The other board never noticed.
    let south = registry.state("south").await.unwrap();
    assert_eq!(south.phase, BoardPhase::Idle);
    assert!(south.players.is_empty());

    sleep(Duration::from_millis(3100)).await;
    let north = registry.state("north").await.unwrap();
    assert_eq!(north.phase, BoardPhase::Idle);
    assert!(north.players.is_empty());
    assert!(north.join_enabled);
    assert!(!north.is_drop_in_progress);
    assert!(north.grid.iter().all(|row| row.chars().all(|c| c == '.')));

    assert!(recorder.calls().contains(&Call::RecordWin {
        player: 1,
        increment: 1
    }));
}

#[tokio::test(start_paused = true)]
async fn test_boards_run_independent_games() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    start_game(&registry, "north").await;

    assert_eq!(
        registry.join("south", carol()).await.unwrap(),
        JoinOutcome::Queued { position: 1 }
    );

    // Alice plays on north; carol cannot drop on south without an opponent.
    assert!(matches!(
        registry.drop_token("north", 1, 5).await.unwrap(),
        DropOutcome::Placed { row: 1, .. }
    ));
    assert_eq!(
        registry.drop_token("south", 3, 5).await.unwrap(),
        DropOutcome::Ignored(DropRejection::Inactive)
    );

    let boards = registry.list_boards().await;
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].board_id, "north");
    assert_eq!(boards[0].active_player, Some(2));
    assert_eq!(boards[1].players, vec![carol()]);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_definitions_are_skipped() {
    let recorder = recorder_with_players();

    let mut no_camera = sample_definition("b", 8);
    no_camera.camera_pose = None;
    let definitions = vec![
        sample_definition("a", 8),
        no_camera,
        sample_definition("a", 8),
        sample_definition("c", 3),
    ];

    let registry =
        BoardRegistry::spawn(definitions, BoardConfig::default(), recorder.collaborators())
            .unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.board_ids(), ["a".to_string()]);
    assert_eq!(registry.rejected().len(), 3);

    assert_eq!(
        registry.join("b", alice()).await,
        Err(BoardError::UnknownBoard("b".to_string()))
    );
    assert!(registry.join("a", alice()).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_config_is_rejected() {
    let recorder = recorder_with_players();
    let config = BoardConfig {
        win_length: 0,
        ..Default::default()
    };
    let result = BoardRegistry::spawn(
        vec![sample_definition("a", 8)],
        config,
        recorder.collaborators(),
    );
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_player_removed_fans_out_to_every_board() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    start_game(&registry, "north").await;
    registry.join("south", carol()).await.unwrap();

    registry.player_removed(2, DepartureReason::Removed).await;

    let north = registry.state("north").await.unwrap();
    assert_eq!(north.phase, BoardPhase::Idle);
    assert!(north.players.is_empty());
    assert!(
        recorder
            .messages_for(1)
            .contains(&Notice::OpponentLeft.to_string())
    );

    let south = registry.state("south").await.unwrap();
    assert_eq!(south.players, vec![carol()]);

    registry.player_removed(3, DepartureReason::Defeated).await;
    assert!(registry.state("south").await.unwrap().players.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_player_added_clears_stale_seat() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    registry.join("south", carol()).await.unwrap();

    registry.player_added(&alice()).await;
    assert_eq!(registry.state("south").await.unwrap().players.len(), 1);

    registry.player_added(&carol()).await;
    assert!(registry.state("south").await.unwrap().players.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_distance_check_evicts_wandering_player() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    start_game(&registry, "north").await;

    sleep(Duration::from_millis(600)).await;
    assert_eq!(
        registry.state("north").await.unwrap().phase,
        BoardPhase::Active
    );

    recorder.set_position(2, Position::new(100.0, 0.0, 0.0));
    sleep(Duration::from_millis(600)).await;

    let north = registry.state("north").await.unwrap();
    assert_eq!(north.phase, BoardPhase::Idle);
    assert!(north.players.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_turn_timeout_keeps_join_disabled_until_reset() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    start_game(&registry, "north").await;

    sleep(Duration::from_secs(31)).await;
    let north = registry.state("north").await.unwrap();
    assert_eq!(north.phase, BoardPhase::Resolving);
    assert!(!north.join_enabled);
    assert!(
        recorder.messages_for(2).contains(
            &Notice::TurnTimedOut {
                player: "alice".to_string()
            }
            .to_string()
        )
    );

    sleep(Duration::from_secs(3)).await;
    let north = registry.state("north").await.unwrap();
    assert_eq!(north.phase, BoardPhase::Idle);
    assert!(north.join_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_leave_through_registry() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);
    start_game(&registry, "north").await;

    assert_eq!(
        registry.leave("north", 3).await.unwrap(),
        drop_four::board::LeaveOutcome::NotQueued
    );
    assert_eq!(
        registry.leave("north", 1).await.unwrap(),
        drop_four::board::LeaveOutcome::Left
    );
    assert!(
        recorder
            .messages_for(2)
            .contains(&Notice::OpponentLeft.to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_boards() {
    let recorder = recorder_with_players();
    let registry = two_boards(&recorder);

    registry.shutdown().await;
    sleep(Duration::from_millis(10)).await;

    assert!(registry.state("north").await.is_err());
    assert!(registry.state("south").await.is_err());
}
