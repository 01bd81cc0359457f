use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm as ConfirmPrompt;
use dotenvy::dotenv;

use educonnect::logging::init_console_logging;
use educonnect::modules::timetable::{
    CreateOutcome, DeleteOutcome, TimetableView, Week, WeekSelector, day_name, parse_day_label,
};
use educonnect::notifications::{AutoConfirm, Confirm, TracingNotifier};
use educonnect::state::{AppState, init_app_state};
use educonnect_models::{ClassId, SessionId, SubjectId, TeacherId, TimetableTarget};

#[derive(Parser)]
#[command(name = "educonnect")]
#[command(about = "EduConnect CLI - View and edit class timetables", long_about = None)]
struct Cli {
    /// Access token (defaults to EDUCONNECT_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable weeks around today
    Weeks,
    /// Print the timetable grid for a class or teacher
    Show {
        #[command(flatten)]
        target: TargetArgs,

        /// Week id (2024-06-03_2024-06-08) or any date inside it
        #[arg(short = 'w', long)]
        week: Option<Week>,
    },
    /// Schedule a new session
    Create {
        #[command(flatten)]
        target: TargetArgs,

        /// Week id or any date inside it
        #[arg(short = 'w', long)]
        week: Option<Week>,

        /// Teaching day (Monday..Saturday)
        #[arg(short = 'd', long)]
        day: String,

        /// Period number
        #[arg(short = 'p', long)]
        period: u32,

        /// Override the date derived from week and day
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Subject ID
        #[arg(short = 's', long)]
        subject: SubjectId,

        /// Teacher ID (defaults to the teacher target)
        #[arg(long = "by")]
        by_teacher: Option<TeacherId>,

        /// Class ID (defaults to the class target)
        #[arg(long = "for-class")]
        for_class: Option<ClassId>,

        /// What is being taught
        #[arg(short = 'l', long)]
        lesson: String,

        /// Optional behaviour note
        #[arg(long)]
        note: Option<String>,

        /// Number of absent students
        #[arg(long, default_value = "0")]
        absent: u32,
    },
    /// Delete a session
    Delete {
        #[command(flatten)]
        target: TargetArgs,

        /// Week id or any date inside it
        #[arg(short = 'w', long)]
        week: Option<Week>,

        /// Session ID
        session: SessionId,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Class ID to show
    #[arg(short = 'c', long, conflicts_with = "teacher")]
    class: Option<ClassId>,

    /// Teacher ID to show (teachers default to themselves)
    #[arg(short = 't', long)]
    teacher: Option<TeacherId>,
}

impl TargetArgs {
    fn target(&self) -> Option<TimetableTarget> {
        match (self.class, self.teacher) {
            (Some(id), _) => Some(TimetableTarget::Class(id)),
            (None, Some(id)) => Some(TimetableTarget::Teacher(id)),
            (None, None) => None,
        }
    }
}

/// Asks on the terminal; anything but an explicit yes is a no.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        ConfirmPrompt::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_console_logging();

    let cli = Cli::parse();
    let state = init_app_state().context("failed to build HTTP client")?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Weeks => handle_weeks(&state, today),
        Commands::Show { target, week } => {
            sign_in(&state, cli.token)?;
            let view = open_view(&state, today, target.target(), week).await?;
            print_grid(&view);
            Ok(())
        }
        Commands::Create {
            target,
            week,
            day,
            period,
            date,
            subject,
            by_teacher,
            for_class,
            lesson,
            note,
            absent,
        } => {
            sign_in(&state, cli.token)?;
            let mut view = open_view(&state, today, target.target(), week).await?;

            let day = parse_day_label(&day)?;
            let mut draft = view.draft_for(day, period)?;
            if draft.period_id.is_none() {
                bail!("period {} does not exist", period);
            }
            draft.date = date.or(draft.date);
            draft.subject_id = Some(subject);
            draft.teacher_id = by_teacher.or(draft.teacher_id);
            draft.class_id = for_class.or(draft.class_id);
            draft.lesson_content = lesson;
            draft.behavior_note = note;
            draft.absent_count = absent;

            match view.create(draft).await {
                Some(CreateOutcome::Added(session)) => {
                    println!("✅ Created session {}", session.session_id);
                    Ok(())
                }
                Some(CreateOutcome::Refetched) | Some(CreateOutcome::RefetchFailed(_)) => {
                    println!("✅ Session created");
                    Ok(())
                }
                None => Err(anyhow!("failed to create session")),
            }
        }
        Commands::Delete {
            target,
            week,
            session,
            yes,
        } => {
            sign_in(&state, cli.token)?;
            let mut view = open_view(&state, today, target.target(), week).await?;

            let outcome = if yes {
                view.delete(session, &AutoConfirm(true)).await
            } else {
                view.delete(session, &TerminalConfirm).await
            };

            match outcome {
                Some(DeleteOutcome::Deleted(_)) => println!("✅ Session deleted"),
                Some(DeleteOutcome::Cancelled) => println!("Cancelled"),
                None => bail!("failed to delete session"),
            }
            Ok(())
        }
    }
}

fn handle_weeks(state: &AppState, today: NaiveDate) -> Result<()> {
    let selector = WeekSelector::new(today, &state.timetable_config);
    for (index, week) in selector.weeks().iter().enumerate() {
        let marker = if index == selector.selected_index() { "*" } else { " " };
        println!("{} {}  {}", marker, week.id(), week.label());
    }
    Ok(())
}

fn sign_in(state: &AppState, token: Option<String>) -> Result<()> {
    let token = token
        .or_else(|| std::env::var("EDUCONNECT_TOKEN").ok())
        .context("no access token: pass --token or set EDUCONNECT_TOKEN")?;
    state.auth.sign_in(&token)?;
    Ok(())
}

async fn open_view(
    state: &AppState,
    today: NaiveDate,
    target: Option<TimetableTarget>,
    week: Option<Week>,
) -> Result<TimetableView> {
    let mut view = TimetableView::open(
        state.api.clone(),
        state.auth.clone(),
        Arc::new(TracingNotifier),
        &state.timetable_config,
        today,
        target,
    )?;

    if !view.load_lookups().await {
        bail!("failed to load lookups");
    }
    match week {
        Some(week) => view.select_week(&week.id()).await?,
        None => {
            view.refresh().await;
        }
    }
    if !state.auth.is_signed_in() {
        bail!("session expired, sign in again");
    }
    Ok(view)
}

fn print_grid(view: &TimetableView) {
    let week = view.selected_week();
    let grid = view.grid();

    println!("Week {}", week.label());
    print!("{:<16}", "Period");
    for (day, date) in week.days() {
        print!("| {:<22}", format!("{} {}", day_name(day), date.format("%m/%d")));
    }
    println!();

    for row in grid.rows(&view.lookups().periods) {
        print!("{:<16}", row.period.label());
        for cell in row.cells {
            let text = cell
                .iter()
                .map(|s| match view.target() {
                    TimetableTarget::Class(_) => format!("{} ({})", s.subject_name, s.teacher_name),
                    TimetableTarget::Teacher(_) => format!("{} ({})", s.subject_name, s.class_name),
                })
                .collect::<Vec<_>>()
                .join(", ");
            print!("| {:<22}", text);
        }
        println!();
    }

    if grid.is_empty() {
        println!("No sessions scheduled this week.");
    }
}
