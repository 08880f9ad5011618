//! A full round played end to end through the registry: optimal keys for
//! every editing and motion task, skips for the visual demonstrations, stats
//! recorded at the finish line.

use core_game::{SessionRegistry, TaskCategory, TaskGenerator};
use core_stats::StatsTracker;

fn tokens(optimal: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = optimal;
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix("<ESC>") {
            out.push("esc".to_string());
            rest = stripped;
        } else {
            let mut chars = rest.chars();
            out.push(chars.next().unwrap().to_string());
            rest = chars.as_str();
        }
    }
    out
}

#[test]
fn full_round_with_optimal_play() {
    let dir = tempfile::tempdir().unwrap();
    let stats_path = dir.path().join("stats.json");
    let registry = SessionRegistry::new(
        TaskGenerator::with_seed(42),
        StatsTracker::open(&stats_path),
    );

    let created = registry.create_session("beginner");
    let id = created.session_id.clone();
    assert_eq!(created.total_tasks, 30);

    let mut skips_used = 0;
    loop {
        let view = registry.session_view(&id).unwrap();
        let Some(task) = view.current_task else {
            break;
        };

        if task.category == TaskCategory::Visual {
            // The visual demonstrations are skipped; three fit well inside
            // the five-skip budget.
            registry.skip_task(&id).unwrap();
            skips_used += 1;
            continue;
        }

        let keys = tokens(&task.optimal_keys);
        let response = registry.keystrokes(&id, &keys).unwrap();
        assert!(
            response.task_completed,
            "task {} not completed by its optimal keys",
            task.task_id
        );
        let complete = registry.complete_task(&id).unwrap();
        assert_eq!(complete.result.efficiency, 100.0, "{}", task.task_id);
        if complete.round_complete {
            break;
        }
    }
    assert_eq!(skips_used, 3);

    let stats = registry.session_stats(&id).unwrap();
    assert_eq!(stats.tasks_attempted, 30);
    assert_eq!(stats.tasks_completed, 27);
    assert_eq!(stats.grade, "B");

    let lifetime = registry.lifetime_stats();
    assert_eq!(lifetime.total_rounds, 1);
    assert_eq!(lifetime.total_tasks, 30);
    assert!(stats_path.exists(), "stats must persist on completion");
}
