#[macro_use]
extern crate bencher;

use bencher::Bencher;
use ggp_search::{ttt, AlphaBeta, Deadline, MctsOptions, MonteCarloTreeSearch, Strategy};

fn bench_alpha_beta_full_game(b: &mut Bencher) {
    let game = ttt::Game::new();
    let board = ttt::Board::default();
    b.iter(|| {
        let mut s = AlphaBeta::new(&game);
        let decision = s.select_move(&board, &ttt::Player::X, Deadline::unlimited());
        assert!(decision.is_ok());
    });
}

fn bench_alpha_beta_warm_cache(b: &mut Bencher) {
    let game = ttt::Game::new();
    let board = ttt::Board::default();
    let mut s = AlphaBeta::new(&game);
    let seeded = s.select_move(&board, &ttt::Player::X, Deadline::unlimited());
    assert!(seeded.is_ok());
    b.iter(|| {
        let decision = s.select_move(&board, &ttt::Player::X, Deadline::unlimited());
        assert!(decision.is_ok());
    });
}

fn bench_mcts_thousand_episodes(b: &mut Bencher) {
    let game = ttt::Game::new();
    let board = ttt::Board::default();
    b.iter(|| {
        let mut s = MonteCarloTreeSearch::with_options(
            &game,
            MctsOptions::default().with_seed(1).with_max_episodes(1000),
        );
        let decision = s.select_move(&board, &ttt::Player::X, Deadline::unlimited());
        assert!(decision.is_ok());
    });
}

benchmark_group!(
    benches,
    bench_alpha_beta_full_game,
    bench_alpha_beta_warm_cache,
    bench_mcts_thousand_episodes
);
benchmark_main!(benches);
