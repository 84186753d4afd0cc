//! services/studio/src/console.rs
//!
//! A line-oriented terminal front-end for the `App` controller.
//! Reads commands from stdin, prints views to stdout.

use crate::app::{App, View};
use crate::error::AppError;
use design_review_core::{
    auth::{AuthError, AuthMode, FieldErrors},
    domain::{Design, DraftField, ScoreBand},
    wizard::{DesignWizard, WizardError, WizardStep},
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

/// Runs until the user quits or stdin closes.
pub async fn run(app: &mut App) -> Result<(), AppError> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_view(app);
        let Some(line) = input.next_line().await? else {
            break;
        };
        let line = line.trim_end().to_string();
        if line == ":quit" || (app.view() != View::Wizard && line == "quit") {
            break;
        }

        match app.view() {
            View::Auth => handle_auth(app, &mut input, &line).await?,
            View::Dashboard => handle_dashboard(app, &line),
            View::Wizard => handle_wizard(app, &line).await,
        }
    }
    Ok(())
}

//=========================================================================================
// Rendering
//=========================================================================================

fn print_view(app: &App) {
    match app.view() {
        View::Auth => {
            println!();
            println!("Commands: login | signup | quit");
        }
        View::Dashboard => {
            let name = app.session().user().map(|u| u.name.as_str()).unwrap_or("");
            println!();
            println!("My Designs ({name})");
            if app.session().designs().is_empty() {
                println!("  No designs yet. Get started by creating your first system design.");
            }
            for (i, design) in app.session().designs().iter().enumerate() {
                println!(
                    "  {}. {} [{}] created {}",
                    i + 1,
                    design.title,
                    badge(design),
                    design.created_at.format("%Y-%m-%d")
                );
            }
            println!("Commands: new | view <n> | export <n> | logout | quit");
        }
        View::Wizard => {
            if let Some(wizard) = app.wizard() {
                print_wizard(wizard);
            }
        }
    }
}

fn badge(design: &Design) -> String {
    match (design.score_band(), &design.evaluation) {
        (ScoreBand::Pending, _) | (_, None) => "Pending".to_string(),
        (band, Some(evaluation)) => format!("Score: {:.1} {:?}", evaluation.score, band),
    }
}

fn print_wizard(wizard: &DesignWizard) {
    let Some(step) = wizard.step() else {
        return;
    };
    let field = step.field();
    println!();
    println!("Step {} of {}: {}", step.number(), WizardStep::COUNT, field.title());
    println!("  {}", field.placeholder());
    let current = wizard.draft().field(field);
    if !current.is_empty() {
        println!("--- current ---\n{current}\n---------------");
    }
    if let Some(error) = wizard.error() {
        println!("! {error}");
    }
    let forward = if step.is_last() { ":submit" } else { ":next" };
    let back = if wizard.can_go_back() { " | :back" } else { "" };
    println!("Type text to append. Commands: {forward}{back} | :clear | :cancel");
}

fn print_field_errors(errors: &FieldErrors) {
    for message in [
        &errors.name,
        &errors.email,
        &errors.password,
        &errors.confirm_password,
    ]
    .into_iter()
    .flatten()
    {
        println!("! {message}");
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

async fn ask(input: &mut Input, label: &str) -> Result<String, AppError> {
    println!("{label}:");
    Ok(input.next_line().await?.unwrap_or_default())
}

async fn handle_auth(app: &mut App, input: &mut Input, line: &str) -> Result<(), AppError> {
    let mode = match line.trim() {
        "login" => AuthMode::Login,
        "signup" => AuthMode::Signup,
        _ => {
            println!("Unknown command.");
            return Ok(());
        }
    };
    app.switch_auth_mode(mode);

    if mode == AuthMode::Signup {
        app.auth_form_mut().name = ask(input, "Full Name").await?;
    }
    app.auth_form_mut().email = ask(input, "Email address").await?;
    app.auth_form_mut().password = ask(input, "Password").await?;
    if mode == AuthMode::Signup {
        app.auth_form_mut().confirm_password = ask(input, "Confirm Password").await?;
    }

    match app.submit_auth() {
        Ok(()) => {}
        Err(AuthError::Validation(errors)) => print_field_errors(&errors),
        Err(e) => println!("! {e}"),
    }
    Ok(())
}

fn handle_dashboard(app: &mut App, line: &str) {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let index = parts
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1));
    let id = index
        .and_then(|i| app.session().designs().get(i))
        .map(|d| d.id.clone());

    match (command, id) {
        ("new", _) => {
            app.new_design();
        }
        ("logout", _) => app.logout(),
        ("view", Some(id)) => {
            if let Some(design) = app.select_design(&id) {
                print_details(design);
            }
            app.close_details();
        }
        ("export", Some(id)) => {
            app.select_design(&id);
            if let Some(markdown) = app.export_selected() {
                println!("{markdown}");
            }
            app.close_details();
        }
        ("view" | "export", None) => println!("No design with that number."),
        _ => println!("Unknown command."),
    }
}

fn print_details(design: &Design) {
    println!();
    println!("{}", design.title);
    println!("Created: {}", design.created_at.format("%Y-%m-%d %H:%M"));
    for field in DraftField::ALL {
        println!("\n[{}]\n{}", field.title(), design.draft.field(field));
    }
    println!("\n[AI Evaluation]");
    match &design.evaluation {
        Some(evaluation) => {
            println!("Overall Score: {:.1}/10", evaluation.score);
            println!("{}", evaluation.feedback);
        }
        None => println!("Evaluation is pending or was not successful."),
    }
}

async fn handle_wizard(app: &mut App, line: &str) {
    let result = match line.trim() {
        ":next" => app.wizard_mut().map(|w| w.next().map(|_| ())),
        ":back" => app.wizard_mut().map(|w| w.back().map(|_| ())),
        ":clear" => app.wizard_mut().map(|w| w.edit("")),
        ":cancel" => Some(app.cancel_wizard()),
        ":submit" => {
            println!("Requesting AI evaluation...");
            Some(app.submit_wizard().await.map(|design| {
                println!("Evaluated \"{}\".", design.title);
            }))
        }
        _ => app.wizard_mut().map(|w| {
            let appended = match w.step().map(|step| w.draft().field(step.field())) {
                Some(current) if !current.is_empty() => format!("{current}\n{line}"),
                _ => line.to_string(),
            };
            w.edit(appended)
        }),
    };

    match result {
        Some(Err(WizardError::Evaluation(_))) => {} // shown via wizard.error()
        Some(Err(e)) => println!("! {e}"),
        Some(Ok(())) | None => {}
    }
}
