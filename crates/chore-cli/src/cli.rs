use std::path::PathBuf;

use chore_engine::config::{clamp_interval, Frequency, MonthlyType, RecurrenceConfig};
use chore_engine::dates::{parse_date, parse_weekday, weekday_index};
use chore_engine::task::Region;
use chrono::{NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "chores")]
#[command(version)]
#[command(about = "Plan recurring chores and see who does what, when")]
pub struct Cli {
    /// JSON file holding members and tasks
    #[arg(long, global = true, default_value = "chores.json")]
    pub data: PathBuf,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = date_arg)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with rule strings directly
    Rule {
        #[command(subcommand)]
        command: RuleCommand,
    },
    /// Manage team members
    Member {
        #[command(subcommand)]
        command: MemberCommand,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// List every occurrence in the visible window
    Agenda(AgendaArgs),
    /// Count open occurrences due today or tomorrow, and those overdue
    Due {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RuleCommand {
    /// Build a rule from recurrence flags; prints "none" if it does not repeat
    Build {
        #[arg(long, value_parser = date_arg)]
        anchor: NaiveDate,
        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    /// Expand a rule into dates
    Expand {
        rule: String,
        #[arg(long, value_parser = date_arg)]
        anchor: NaiveDate,
        #[arg(long, value_parser = date_arg)]
        from: NaiveDate,
        #[arg(long, value_parser = date_arg)]
        to: NaiveDate,
        #[arg(long)]
        json: bool,
    },
    /// Describe a rule in English
    Describe { rule: Option<String> },
    /// Read a rule back into its recurrence settings (JSON)
    Parse { rule: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    /// Add a member and print its id
    Add {
        name: String,
        /// #rrggbb; the next free palette colour when omitted
        #[arg(long)]
        color: Option<String>,
        #[arg(long, value_parser = region_arg)]
        region: Option<Region>,
    },
    List,
    /// Remove a member, unassigning their tasks
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task and print its id
    Add {
        title: String,
        #[arg(long, value_parser = date_arg)]
        start: NaiveDate,
        /// Last day of a multi-day one-off task
        #[arg(long, value_parser = date_arg)]
        end: Option<NaiveDate>,
        /// Member id
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    List,
    Remove { id: String },
    /// Replace a task's recurrence and print the new schedule
    Repeat {
        id: String,
        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    /// Toggle completion of one occurrence
    Done {
        id: String,
        #[arg(value_parser = date_arg)]
        date: NaiveDate,
    },
}

#[derive(Args, Debug)]
pub struct AgendaArgs {
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub months_before: Option<u32>,
    #[arg(long)]
    pub months_after: Option<u32>,
}

/// The recurrence form, as flags.
#[derive(Args, Debug, Clone)]
pub struct RecurrenceArgs {
    #[arg(long, value_enum, default_value_t = FrequencyArg::None)]
    pub frequency: FrequencyArg,
    /// Repeat every N units; clamped to 1..=99
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub interval: i64,
    /// Day for weekly and custom rules (mon..sun); repeatable
    #[arg(long = "weekday", value_parser = weekday_arg)]
    pub weekdays: Vec<Weekday>,
    #[arg(long, value_enum, default_value_t = MonthlyTypeArg::DayOfMonth)]
    pub monthly_type: MonthlyTypeArg,
    /// Last day the rule may fall on
    #[arg(long, value_parser = date_arg)]
    pub until: Option<NaiveDate>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyArg {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyTypeArg {
    DayOfMonth,
    DayOfWeek,
}

impl RecurrenceArgs {
    pub fn to_config(&self) -> RecurrenceConfig {
        let frequency = match self.frequency {
            FrequencyArg::None => Frequency::None,
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Custom => Frequency::Custom,
        };
        let monthly_type = match self.monthly_type {
            MonthlyTypeArg::DayOfMonth => MonthlyType::DayOfMonth,
            MonthlyTypeArg::DayOfWeek => MonthlyType::DayOfWeek,
        };
        RecurrenceConfig {
            frequency,
            interval: clamp_interval(self.interval),
            weekdays: self.weekdays.iter().map(|&d| weekday_index(d)).collect(),
            monthly_type,
            end_date: self.until,
        }
    }
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn weekday_arg(s: &str) -> Result<Weekday, String> {
    parse_weekday(s).ok_or_else(|| format!("unknown weekday '{s}'"))
}

fn region_arg(s: &str) -> Result<Region, String> {
    Region::from_code(s).ok_or_else(|| format!("unknown region '{s}'"))
}
