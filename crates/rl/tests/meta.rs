use rl::{AntDirConfig, AntDirEnv, Direction, Env, EnvError, MetaEnv, TimeLimit};

fn env(seed: u64, max_episode_steps: usize) -> TimeLimit<AntDirEnv> {
    let config = AntDirConfig {
        seed: Some(seed),
        max_episode_steps,
        ..AntDirConfig::default()
    };
    let steps = config.max_episode_steps;
    TimeLimit::new(AntDirEnv::new(config).unwrap(), steps)
}

#[test]
fn sampled_tasks_cover_both_directions() {
    let mut env = env(0, 10);
    let tasks = env.sample_tasks(200);
    assert_eq!(tasks.len(), 200);
    let forward = tasks
        .iter()
        .filter(|t| t.direction == Direction::Forward)
        .count();
    assert!(forward > 60 && forward < 140, "forward count {forward}");
    assert!(tasks.iter().all(|t| t.direction.sign().abs() == 1.0));
}

#[test]
fn task_sampling_is_seeded() {
    let mut a = env(12, 10);
    let mut b = env(12, 10);
    assert_eq!(a.sample_tasks(32), b.sample_tasks(32));
    assert!(a.sample_tasks(0).is_empty());
}

#[test]
fn task_persists_across_resets() {
    let mut env = env(1, 10);
    let task = env.sample_tasks(1)[0];
    env.reset_task(task);
    env.reset().unwrap();
    env.reset().unwrap();
    let step = env.step(&[0.0; 8]).unwrap();
    assert_eq!(step.info.inner.task, Some(task));
    assert!((env.inner().goal_direction() - task.direction.sign()).abs() < f64::EPSILON);
}

#[test]
fn episodes_are_truncated() {
    let mut env = env(2, 5);
    assert_eq!(env.step(&[0.0; 8]).unwrap_err(), EnvError::NeedsReset);
    env.reset().unwrap();
    let mut steps = 0;
    loop {
        let step = env.step(&[0.0; 8]).unwrap();
        steps += 1;
        if step.done {
            assert!(step.info.truncated);
            break;
        }
    }
    assert_eq!(steps, 5);
}
