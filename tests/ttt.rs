// End-to-end matches on the bundled tic-tac-toe game.

use std::time::Duration;

use ggp_search::util::play_match;
use ggp_search::{
    ttt, AlphaBeta, Deadline, MctsOptions, MonteCarloTreeSearch, Oracle, Random, Strategy,
};

fn mid_game_with_a_win_for_x(game: &ttt::Game) -> ttt::Board {
    // X holds 0 and 1, O holds 3 and 4; X to move wins with square 2.
    let mut board = ttt::Board::default();
    for joint in [
        vec![ttt::Move::Place(0), ttt::Move::Noop],
        vec![ttt::Move::Noop, ttt::Move::Place(3)],
        vec![ttt::Move::Place(1), ttt::Move::Noop],
        vec![ttt::Move::Noop, ttt::Move::Place(4)],
    ] {
        board = game.next_state(&board, &joint).unwrap();
    }
    board
}

#[test]
fn alpha_beta_self_play_is_a_draw() {
    let game = ttt::Game::new();
    let mut x = AlphaBeta::new(&game);
    let mut o = AlphaBeta::new(&game);
    let mut players: [&mut dyn Strategy<&ttt::Game>; 2] = [&mut x, &mut o];

    let (end, goals) =
        play_match(&game, &ttt::Board::default(), &mut players, Duration::from_secs(5)).unwrap();
    assert!(game.is_terminal(&end));
    assert_eq!(goals, vec![50, 50], "final position:\n{}", end);
}

#[test]
fn alpha_beta_never_loses_to_random() {
    let game = ttt::Game::new();
    for seed in 0..5 {
        let mut search = AlphaBeta::new(&game);
        let mut chaos = Random::with_seed(&game, seed);
        let mut players: [&mut dyn Strategy<&ttt::Game>; 2] = [&mut search, &mut chaos];
        let (_, goals) =
            play_match(&game, &ttt::Board::default(), &mut players, Duration::from_secs(5))
                .unwrap();
        assert!(goals[0] >= 50, "lost as X with seed {}: {:?}", seed, goals);

        let mut chaos = Random::with_seed(&game, seed);
        let mut search = AlphaBeta::new(&game);
        let mut players: [&mut dyn Strategy<&ttt::Game>; 2] = [&mut chaos, &mut search];
        let (_, goals) =
            play_match(&game, &ttt::Board::default(), &mut players, Duration::from_secs(5))
                .unwrap();
        assert!(goals[1] >= 50, "lost as O with seed {}: {:?}", seed, goals);
    }
}

#[test]
fn alpha_beta_takes_the_winning_square() {
    let game = ttt::Game::new();
    let board = mid_game_with_a_win_for_x(&game);
    let mut search = AlphaBeta::new(&game);
    let decision = search.select_move(&board, &ttt::Player::X, Deadline::unlimited()).unwrap();
    assert_eq!(decision.chosen, ttt::Move::Place(2));
    assert_eq!(search.root_value(), Some(100));
}

#[test]
fn mcts_takes_the_winning_square() {
    let game = ttt::Game::new();
    let board = mid_game_with_a_win_for_x(&game);
    let mut search = MonteCarloTreeSearch::with_options(
        &game,
        MctsOptions::default().with_seed(4).with_max_episodes(2000),
    );
    let decision = search.select_move(&board, &ttt::Player::X, Deadline::unlimited()).unwrap();
    assert_eq!(decision.chosen, ttt::Move::Place(2));
    assert_eq!(search.stats().episodes, 2000);
}

#[test]
fn mcts_outscores_random() {
    let game = ttt::Game::new();
    let mut total = 0;
    for seed in 0..3 {
        let mut search = MonteCarloTreeSearch::with_options(
            &game,
            MctsOptions::default().with_seed(seed).with_max_episodes(3000),
        );
        let mut chaos = Random::with_seed(&game, seed);
        let mut players: [&mut dyn Strategy<&ttt::Game>; 2] = [&mut search, &mut chaos];
        let (_, goals) =
            play_match(&game, &ttt::Board::default(), &mut players, Duration::from_secs(5))
                .unwrap();
        total += goals[0];
    }
    assert!(total >= 150, "scored {} over three games", total);
}

#[test]
fn every_move_is_legal_under_time_pressure() {
    let game = ttt::Game::new();
    let mut x = AlphaBeta::new(&game);
    let mut o = MonteCarloTreeSearch::with_options(&game, MctsOptions::default().with_seed(17));
    let budget = Duration::from_millis(30);

    let mut board = ttt::Board::default();
    while !game.is_terminal(&board) {
        let for_x = x.select_move(&board, &ttt::Player::X, Deadline::from_now(budget)).unwrap();
        let for_o = o.select_move(&board, &ttt::Player::O, Deadline::from_now(budget)).unwrap();
        assert!(game.legal_moves(&board, &ttt::Player::X).unwrap().contains(&for_x.chosen));
        assert!(game.legal_moves(&board, &ttt::Player::O).unwrap().contains(&for_o.chosen));
        board = game.next_state(&board, &vec![for_x.chosen, for_o.chosen]).unwrap();
    }
}

#[test]
fn seeded_searches_are_reproducible() {
    let game = ttt::Game::new();
    let opts = || MctsOptions::default().with_seed(42).with_max_episodes(500);

    let mut first = MonteCarloTreeSearch::with_options(&game, opts());
    let mut second = MonteCarloTreeSearch::with_options(&game, opts());
    let board = ttt::Board::default();
    let a = first.select_move(&board, &ttt::Player::X, Deadline::unlimited()).unwrap();
    let b = second.select_move(&board, &ttt::Player::X, Deadline::unlimited()).unwrap();
    assert_eq!(a.chosen, b.chosen);
    assert_eq!(first.stats().episodes, second.stats().episodes);
    assert_eq!(first.tree_len(), second.tree_len());
}
