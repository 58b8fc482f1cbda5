use snake_qlearn::game::{CollisionType, GameConfig, Position};
use snake_qlearn::modes::{evaluate, train, EvalConfig};
use snake_qlearn::rl::{
    load_q_table, save_q_table, EncodedState, QLearningConfig, SnakeEnvironment,
    STATE_SPACE_SIZE,
};
use tempfile::TempDir;

fn short_run(seed: u64) -> QLearningConfig {
    QLearningConfig {
        episodes: 150,
        max_steps: 200,
        seed,
        report_every: 50,
        ..Default::default()
    }
}

#[test]
fn straight_run_hits_east_wall() {
    let mut env = SnakeEnvironment::new(GameConfig::square(12), 0);
    env.reset();
    assert_eq!(env.state().snake.head(), Position::new(6, 6));

    let mut calls = 0;
    let (reward, info) = loop {
        let (_, reward, done, info) = env.step(1);
        calls += 1;
        if done {
            break (reward, info);
        }
        assert!(calls < 12, "snake never reached the wall");
    };

    assert_eq!(calls, 6);
    assert_eq!(reward, -10.0);
    assert_eq!(info.collision_type, Some(CollisionType::Wall));
    assert_eq!(env.state().snake.head().x, 11);
    assert_eq!(env.state().steps, 5);
    assert!(!env.state().is_alive);
}

#[test]
fn train_then_evaluate() {
    let outcome = train(GameConfig::square(8), short_run(0)).unwrap();

    assert_eq!(outcome.scores.len(), 150);
    assert!(!outcome.agent.is_empty());
    assert!(outcome.agent.len() <= STATE_SPACE_SIZE);
    let best = outcome.summary.best_score.unwrap();
    assert_eq!(best, *outcome.scores.iter().max().unwrap());
    let best_episode = outcome.summary.best_episode.unwrap();
    assert_eq!(outcome.scores[best_episode - 1], best);

    let eval = evaluate(
        &outcome.agent,
        &EvalConfig {
            game_config: GameConfig::square(8),
            episodes: 10,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(eval.episodes, 10);
    assert!(eval.min_score <= eval.max_score);
    assert!(eval.mean_score >= eval.min_score as f64);
    assert!(eval.mean_score <= eval.max_score as f64);
}

#[test]
fn training_is_reproducible() {
    let a = train(GameConfig::square(8), short_run(42)).unwrap();
    let b = train(GameConfig::square(8), short_run(42)).unwrap();

    assert_eq!(a.scores, b.scores);
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.agent.len(), b.agent.len());
    for packed in 0..STATE_SPACE_SIZE as u16 {
        let state = EncodedState::unpack(packed).unwrap();
        assert_eq!(a.agent.values(state), b.agent.values(state));
    }
}

#[test]
fn evaluation_survives_persistence() {
    let outcome = train(GameConfig::square(8), short_run(7)).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run/qtable.json");
    save_q_table(&outcome.agent, &path).unwrap();
    let restored = load_q_table(&path, 0).unwrap();

    let config = EvalConfig {
        game_config: GameConfig::square(8),
        episodes: 5,
        ..Default::default()
    };
    assert_eq!(
        evaluate(&outcome.agent, &config).unwrap(),
        evaluate(&restored, &config).unwrap()
    );
}

#[test]
fn evaluation_with_zero_episodes() {
    let outcome = train(GameConfig::square(6), QLearningConfig { episodes: 5, ..Default::default() }).unwrap();
    let eval = evaluate(
        &outcome.agent,
        &EvalConfig {
            game_config: GameConfig::square(6),
            episodes: 0,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(eval.mean_score, 0.0);
    assert_eq!(eval.std_score, 0.0);
    assert_eq!((eval.max_score, eval.min_score), (0, 0));
}
