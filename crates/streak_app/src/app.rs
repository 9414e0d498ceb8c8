use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use streak_core::day::{format_day, parse_day};
use streak_domain::{
    clock::FixedClock,
    habit::{Habit, HabitDetail, HabitId, NewHabit, OwnerId},
    HabitService,
};
use tracing::{info, warn};

const DEFAULT_DATA_DIR: &str = "habit-data";
const DEFAULT_OWNER: &str = "guest";

pub const USAGE: &str = "\
usage: streak <command>

commands:
  list                               list habits
  add <name> <DD/MM/YYYY> <DD/MM/YYYY>  create a habit for a date range
  show <id>                          metrics and the last 7 days
  toggle <id> [days-before]          cycle a day's status (default: today)
  delete <id>                        remove a habit

environment:
  HABIT_DATA_DIR   store directory (default ./habit-data)
  HABIT_OWNER      whose habits to use (default guest)
  HABIT_TODAY      override today's date, DD/MM/YYYY";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_dir: PathBuf,
    pub(crate) owner: OwnerId,
    pub(crate) today: Option<NaiveDate>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("HABIT_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(owner) = std::env::var("HABIT_OWNER") {
            let owner = owner.trim();
            if owner.is_empty() {
                warn!("HABIT_OWNER is empty; using `{DEFAULT_OWNER}`");
            } else {
                config.owner = OwnerId::new(owner);
            }
        }
        if let Ok(today) = std::env::var("HABIT_TODAY") {
            match parse_day(&today) {
                Ok(day) => config.today = Some(day),
                Err(err) => warn!(%err, "ignoring HABIT_TODAY"),
            }
        }
        info!(
            data_dir = %config.data_dir.display(),
            owner = %config.owner,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn service(&self) -> Result<HabitService> {
        let mut builder = HabitService::builder().with_json_store(&self.data_dir)?;
        if let Some(today) = self.today {
            builder = builder.with_clock(Arc::new(FixedClock(today)));
        }
        Ok(builder.build())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            owner: OwnerId::new(DEFAULT_OWNER),
            today: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(NewHabit),
    Show(HabitId),
    Toggle { id: HabitId, days_before: i64 },
    Delete(HabitId),
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::List);
        };
        match (name.as_str(), rest) {
            ("list", []) => Ok(Command::List),
            ("add", [habit_name, start, end]) => Ok(Command::Add(NewHabit {
                name: habit_name.trim().to_string(),
                start_date: parse_day(start)?,
                end_date: parse_day(end)?,
            })),
            ("show", [id]) => Ok(Command::Show(parse_id(id)?)),
            ("toggle", [id]) => Ok(Command::Toggle {
                id: parse_id(id)?,
                days_before: 0,
            }),
            ("toggle", [id, back]) => Ok(Command::Toggle {
                id: parse_id(id)?,
                days_before: back
                    .trim()
                    .parse()
                    .with_context(|| format!("`{back}` is not a whole number of days"))?,
            }),
            ("delete", [id]) => Ok(Command::Delete(parse_id(id)?)),
            ("help" | "-h" | "--help", _) => Ok(Command::Help),
            (other, _) => bail!("unrecognised command `{other}` or wrong number of arguments"),
        }
    }
}

fn parse_id(raw: &str) -> Result<HabitId> {
    HabitId::parse(raw).ok_or_else(|| anyhow!("`{raw}` is not a habit id"))
}

/// Executes `command` and returns the text to show the user.
pub fn run(config: &AppConfig, command: Command) -> Result<String> {
    if command == Command::Help {
        return Ok(USAGE.to_string());
    }
    let service = config.service()?;
    let owner = &config.owner;
    match command {
        Command::List => Ok(render_list(&service.habits(owner)?)),
        Command::Add(fields) => {
            let habit = service.add_habit(owner, fields)?;
            Ok(format!("created {} ({})", habit.name, habit.id))
        }
        Command::Show(id) => Ok(render_detail(&service.show_habit(owner, id)?)),
        Command::Toggle { id, days_before } => {
            service.toggle_day(owner, id, days_before)?;
            Ok(render_detail(&service.show_habit(owner, id)?))
        }
        Command::Delete(id) => {
            let removed = service.delete_habit(owner, id)?;
            Ok(format!("deleted {}", removed.name))
        }
        Command::Help => Ok(USAGE.to_string()),
    }
}

pub fn render_list(habits: &[Habit]) -> String {
    if habits.is_empty() {
        return "no habits yet".to_string();
    }
    habits
        .iter()
        .map(|habit| {
            format!(
                "{}  {}  {} - {}  streak {} (best {})\n",
                habit.id,
                habit.name,
                format_day(habit.start_date),
                format_day(habit.end_date),
                habit.current_streak,
                habit.best_streak,
            )
        })
        .collect()
}

pub fn render_detail(detail: &HabitDetail) -> String {
    let habit = &detail.habit;
    let mut out = format!(
        "{} ({})\nstarted {}, ends {}\ncurrent streak {}, best streak {}, success {}/{} days\n",
        habit.name,
        habit.id,
        format_day(habit.start_date),
        format_day(habit.end_date),
        habit.current_streak,
        habit.best_streak,
        habit.success_days,
        habit.total_tracked_days,
    );
    for entry in &detail.last_days {
        let label = entry.status.map(|status| status.label()).unwrap_or("-");
        out.push_str(&format!("  {} {}\n", entry.date.format("%a %d/%m/%Y"), label));
    }
    out
}
