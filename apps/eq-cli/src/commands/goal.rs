// goal.rs — Goal subcommands: add, list, show, record, delete.

use anyhow::bail;
use clap::Subcommand;
use eq_goal::{GoalStore, GoalType, KeyValueStorage, NewGoal};

use super::report_warning;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a new goal.
    Add {
        /// Goal name (at least 3 characters).
        name: String,
        /// What the goal is about (at least 10 characters).
        #[arg(long)]
        description: String,
        /// Goal type: simple, eternal or checklist.
        #[arg(long = "type", default_value = "simple")]
        goal_type: GoalType,
        /// Points awarded per recording.
        #[arg(long)]
        points: u32,
        /// Recordings needed to complete a checklist goal.
        #[arg(long)]
        target: Option<u32>,
        /// Bonus awarded when a checklist goal completes.
        #[arg(long)]
        bonus: Option<u32>,
    },
    /// List goals.
    List {
        /// Only show goals of this type.
        #[arg(long = "type")]
        goal_type: Option<GoalType>,
    },
    /// Show details for one goal.
    Show {
        /// Goal ID.
        id: String,
    },
    /// Record an event against a goal and collect its points.
    Record {
        /// Goal ID.
        id: String,
    },
    /// Delete a goal. Points already earned are kept.
    Delete {
        /// Goal ID.
        id: String,
    },
}

pub fn execute<S: KeyValueStorage>(
    cmd: &GoalCommands,
    store: &mut GoalStore<S>,
) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Add {
            name,
            description,
            goal_type,
            points,
            target,
            bonus,
        } => {
            let input = NewGoal {
                name: name.clone(),
                description: description.clone(),
                goal_type: *goal_type,
                points: *points,
                target: *target,
                bonus: *bonus,
            };
            add_goal(store, &input)
        }
        GoalCommands::List { goal_type } => list_goals(store, *goal_type),
        GoalCommands::Show { id } => show_goal(store, id),
        GoalCommands::Record { id } => record_event(store, id),
        GoalCommands::Delete { id } => delete_goal(store, id),
    }
}

fn add_goal<S: KeyValueStorage>(store: &mut GoalStore<S>, input: &NewGoal) -> anyhow::Result<()> {
    let outcome = store.create(input)?;
    if let Some(ref e) = outcome.warning {
        report_warning(e);
    }
    let goal = outcome.value;

    println!("Goal created successfully!");
    println!("  ID:     {}", goal.id);
    println!("  Name:   {}", goal.name);
    println!("  Type:   {} Goal", goal.goal_type().title());
    println!("  Points: {}", goal.points_label());
    Ok(())
}

fn list_goals<S: KeyValueStorage>(
    store: &GoalStore<S>,
    goal_type: Option<GoalType>,
) -> anyhow::Result<()> {
    if store.goals().is_empty() {
        println!("No goals yet. Add your first goal with `quest goal add`.");
        return Ok(());
    }

    let goals: Vec<_> = store.goals_of_type(goal_type).collect();
    if goals.is_empty() {
        let kind = goal_type.map(|t| t.to_string()).unwrap_or_default();
        println!("No {} goals found.", kind);
        return Ok(());
    }

    println!(
        "{:<38} {:<26} {:<10} {:<12} {}",
        "ID", "NAME", "TYPE", "PROGRESS", "POINTS"
    );
    println!("{}", "-".repeat(100));

    for g in &goals {
        println!(
            "{:<38} {:<26} {:<10} {:<12} {}",
            g.id,
            truncate(&g.name, 24),
            g.goal_type().to_string(),
            g.progress_label(),
            g.points_label(),
        );
    }
    println!("\n{} goal(s) shown. Total score: {}", goals.len(), store.total_score());

    Ok(())
}

fn show_goal<S: KeyValueStorage>(store: &GoalStore<S>, id: &str) -> anyhow::Result<()> {
    let Some(g) = store.get(id) else {
        bail!("Goal not found: {}", id);
    };

    println!("Goal:        {}", g.id);
    println!("Name:        {}", g.name);
    println!("Description: {}", g.description);
    println!("Type:        {} Goal", g.goal_type().title());
    println!("Points:      {}", g.points_label());
    println!("Progress:    {}", g.progress_label());
    println!("Completed:   {}", if g.is_completed() { "yes" } else { "no" });
    println!("Created:     {}", g.created_at.to_rfc3339());
    Ok(())
}

fn record_event<S: KeyValueStorage>(store: &mut GoalStore<S>, id: &str) -> anyhow::Result<()> {
    let outcome = store.record(id)?;
    if let Some(ref e) = outcome.warning {
        report_warning(e);
    }
    let award = outcome.value;

    if award.already_completed() {
        println!("No points earned (already completed)");
    } else {
        println!("Earned {} points!", award.points);
        if award.completed {
            println!("Goal complete.");
        }
    }
    println!("Total score: {} (level {})", store.total_score(), store.level());
    Ok(())
}

fn delete_goal<S: KeyValueStorage>(store: &mut GoalStore<S>, id: &str) -> anyhow::Result<()> {
    let outcome = store.delete(id);
    if let Some(ref e) = outcome.warning {
        report_warning(e);
    }
    if outcome.value {
        println!("Goal deleted");
    } else {
        println!("No goal with id {}; nothing deleted.", id);
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_goal::{GoalError, MemoryStorage};

    fn store() -> GoalStore<MemoryStorage> {
        GoalStore::load(MemoryStorage::new()).into_value()
    }

    #[test]
    fn add_creates_checklist_goal() {
        let mut store = store();
        let cmd = GoalCommands::Add {
            name: "Read Books".to_string(),
            description: "Finish five books this year".to_string(),
            goal_type: GoalType::Checklist,
            points: 20,
            target: Some(5),
            bonus: Some(100),
        };
        execute(&cmd, &mut store).unwrap();

        let goal = store.goals().last().unwrap();
        assert_eq!(goal.name, "Read Books");
        assert_eq!(goal.target(), Some(5));
        assert_eq!(goal.bonus(), Some(100));
    }

    #[test]
    fn add_reports_validation_field() {
        let mut store = store();
        let cmd = GoalCommands::Add {
            name: "Go".to_string(),
            description: "Too short a name".to_string(),
            goal_type: GoalType::Simple,
            points: 5,
            target: None,
            bonus: None,
        };
        let err = execute(&cmd, &mut store).unwrap_err();
        let goal_err = err.downcast_ref::<GoalError>().unwrap();
        assert_eq!(goal_err.field(), Some("name"));
        assert_eq!(store.goals().len(), 3);
    }

    #[test]
    fn record_updates_score() {
        let mut store = store();
        execute(&GoalCommands::Record { id: "3".to_string() }, &mut store).unwrap();
        assert_eq!(store.total_score(), 400);
        assert_eq!(store.get("3").unwrap().progress(), 4);
    }

    #[test]
    fn record_unknown_goal_fails() {
        let mut store = store();
        let err = execute(&GoalCommands::Record { id: "42".to_string() }, &mut store).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GoalError>(),
            Some(GoalError::NotFound(_))
        ));
    }

    #[test]
    fn delete_then_show_fails() {
        let mut store = store();
        execute(&GoalCommands::Delete { id: "1".to_string() }, &mut store).unwrap();
        assert!(execute(&GoalCommands::Show { id: "1".to_string() }, &mut store).is_err());
        // Unknown id is not an error.
        execute(&GoalCommands::Delete { id: "1".to_string() }, &mut store).unwrap();
        assert_eq!(store.total_score(), 350);
    }

    #[test]
    fn list_with_filter_succeeds() {
        let mut store = store();
        execute(
            &GoalCommands::List {
                goal_type: Some(GoalType::Eternal),
            },
            &mut store,
        )
        .unwrap();
        execute(&GoalCommands::List { goal_type: None }, &mut store).unwrap();
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Día de la Tierra limpia", 10), "Día de ...");
    }
}
