// stats.rs — Overview of score, level and goal counts.

use eq_goal::{GoalStore, KeyValueStorage, Summary};

pub fn execute<S: KeyValueStorage>(store: &GoalStore<S>) -> anyhow::Result<()> {
    print!("{}", render(&store.summary()));
    Ok(())
}

fn render(summary: &Summary) -> String {
    let rows = [
        ("Total Points", summary.total_score.to_string()),
        ("Level", summary.level.to_string()),
        ("Total Goals", summary.total_goals.to_string()),
        ("Completed", summary.completed.to_string()),
        ("Simple", summary.simple.to_string()),
        ("Eternal", summary.eternal.to_string()),
        ("Checklist", summary.checklist.to_string()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{:<14} {}\n", label, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_goal::MemoryStorage;

    #[test]
    fn renders_default_store() {
        let store = GoalStore::load(MemoryStorage::new()).into_value();
        let text = render(&store.summary());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Total Points   350");
        assert_eq!(lines[1], "Level          1");
        assert_eq!(lines[2], "Total Goals    3");
        assert_eq!(lines[3], "Completed      0");
    }
}
