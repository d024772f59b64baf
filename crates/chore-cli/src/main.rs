mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use chore_engine::dates::format_date;
use chore_engine::store::JsonFileStore;
use chore_engine::task::{NewMember, NewTask};
use chore_engine::window::WindowConfig;
use chore_engine::{config_to_rule, describe, expand, parse_rule, Planner};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{AgendaArgs, Cli, Commands, MemberCommand, RuleCommand, TaskCommand};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Cli {
        data,
        today,
        command,
    } = Cli::parse();
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    match command {
        Commands::Rule { command } => run_rule(command),
        Commands::Member { command } => run_member(open(&data)?, command),
        Commands::Task { command } => run_task(open(&data)?, command),
        Commands::Agenda(args) => run_agenda(&open(&data)?, &args, today),
        Commands::Due { json } => run_due(&open(&data)?, today, json),
    }
}

fn open(data: &Path) -> Result<Planner<JsonFileStore>> {
    Planner::open(JsonFileStore::new(data))
        .with_context(|| format!("failed to load {}", data.display()))
}

fn run_rule(command: RuleCommand) -> Result<()> {
    match command {
        RuleCommand::Build { anchor, recurrence } => {
            let rule = config_to_rule(&recurrence.to_config(), anchor);
            println!("{}", rule.as_deref().unwrap_or("none"));
        }
        RuleCommand::Expand {
            rule,
            anchor,
            from,
            to,
            json,
        } => print_dates(&expand(&rule, anchor, from, to), json)?,
        RuleCommand::Describe { rule } => println!("{}", describe(rule.as_deref())),
        RuleCommand::Parse { rule } => {
            let config = parse_rule(rule.as_deref());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn run_member(mut planner: Planner<JsonFileStore>, command: MemberCommand) -> Result<()> {
    match command {
        MemberCommand::Add {
            name,
            color,
            region,
        } => {
            let member = planner.add_member(NewMember {
                name,
                color,
                region,
            })?;
            println!("{}", member.id);
        }
        MemberCommand::List => {
            for member in &planner.state().team_members {
                let region = member.region.map_or("-", |r| r.code());
                println!("{}\t{}\t{}\t{}", member.id, member.name, member.color, region);
            }
        }
        MemberCommand::Remove { id } => planner.remove_member(&id)?,
    }
    Ok(())
}

fn run_task(mut planner: Planner<JsonFileStore>, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            start,
            end,
            assignee,
            description,
            recurrence,
        } => {
            let task = planner.add_task(NewTask {
                description,
                assignee_id: assignee,
                end_date: end,
                recurrence_rule: config_to_rule(&recurrence.to_config(), start),
                ..NewTask::new(title, start)
            })?;
            println!("{}", task.id);
        }
        TaskCommand::List => {
            for task in &planner.state().tasks {
                let assignee = task
                    .assignee_id
                    .as_deref()
                    .and_then(|id| planner.state().member(id))
                    .map_or("Unassigned", |m| m.name.as_str());
                println!("{}\t{}\t{}\t{}", task.id, task.title, task.schedule(), assignee);
            }
        }
        TaskCommand::Remove { id } => planner.remove_task(&id)?,
        TaskCommand::Repeat { id, recurrence } => {
            let rule = planner.set_recurrence(&id, &recurrence.to_config())?;
            println!("{}", describe(rule.as_deref()));
        }
        TaskCommand::Done { id, date } => {
            let completed = planner.toggle_completion(&id, date)?;
            println!("{}", if completed { "completed" } else { "pending" });
        }
    }
    Ok(())
}

fn run_agenda(planner: &Planner<JsonFileStore>, args: &AgendaArgs, today: NaiveDate) -> Result<()> {
    let defaults = WindowConfig::default();
    let window = WindowConfig {
        months_before: args.months_before.unwrap_or(defaults.months_before),
        months_after: args.months_after.unwrap_or(defaults.months_after),
    }
    .around(today);
    log::debug!("agenda window {} ..= {}", window.start, window.end);

    let events = planner.events(&window);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }
    for event in &events {
        let mark = if event.is_completed { "x" } else { " " };
        println!(
            "{} [{mark}] {} ({})",
            format_date(event.start),
            event.title,
            event.assignee_name
        );
    }
    Ok(())
}

fn run_due(planner: &Planner<JsonFileStore>, today: NaiveDate, json: bool) -> Result<()> {
    let summary = planner.due(today);
    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{} upcoming, {} overdue", summary.upcoming, summary.overdue);
    }
    Ok(())
}

fn print_dates(dates: &[NaiveDate], json: bool) -> Result<()> {
    let dates: Vec<String> = dates.iter().copied().map(format_date).collect();
    if json {
        println!("{}", serde_json::to_string(&dates)?);
    } else {
        for date in dates {
            println!("{date}");
        }
    }
    Ok(())
}
