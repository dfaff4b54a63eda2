use std::{
    io::{stdin, stdout, Write},
    sync::Arc,
};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType, SetTitle},
};

use crate::{
    model::draft::DraftInput,
    service::{draft_parser::normalize_draft, predictapi::client::PredictionClient},
    ui::prediction_slot::{PredictionSlot, SubmissionState},
};

use super::ReplError;

type ReplResult = Result<(), ReplError>;
type CommandFunction = fn(&mut Session) -> ReplResult;
type Command<'a> = (u8, &'a str, CommandFunction);

struct Session {
    input: DraftInput,
    client: Arc<PredictionClient>,
    slot: PredictionSlot,
}

pub fn run(client: PredictionClient, input: DraftInput) -> ReplResult {
    let mut session = Session {
        input,
        client: Arc::new(client),
        slot: PredictionSlot::default(),
    };

    let available_commands: Vec<Command> = vec![
        (1, "Edit Champions", edit_champions),
        (2, "Edit Lanes", edit_lanes),
        (3, "Edit Runes", edit_runes),
        (4, "Edit Patch", edit_patch),
        (5, "Toggle Side", toggle_side),
        (10, "Show Draft", show_draft),
        (20, "Predict", submit),
        (21, "Show Result", show_result),
    ];

    let _ = execute!(stdout(), SetTitle("DraftDiff"), Clear(ClearType::All), MoveTo(0, 0));
    println!("DraftDiff - estimate win probability from draft context");
    println!("Prediction service: {}", session.client.config().base_url);
    match session.client.health() {
        Ok(health) => println!("Service status: {}", health),
        Err(err) => println!("Service status: unavailable ({})", err),
    }
    println!("==================================\n");

    loop {
        print_options(&available_commands);
        match get_command(&available_commands)? {
            None => break,
            Some(command) => {
                println!("~~~~~\n");
                command.2(&mut session)?;
                println!("\n~~~~~\n");
            }
        }
    }

    println!("\nBye bye!");
    Ok(())
}

fn print_options(available_commands: &[Command]) {
    for (id, desc, _) in available_commands {
        println!("({id:>2})  {desc}");
    }
    println!("( 0)  Quit\n");
}

fn get_command<'a>(available_commands: &'a [Command<'a>]) -> Result<Option<&'a Command<'a>>, ReplError> {
    loop {
        let line = match read_line("> Your choice: ")? {
            Some(line) => line,
            None => return Ok(None),
        };

        if let Ok(choice) = line.trim().parse::<u8>() {
            if choice == 0 {
                return Ok(None);
            }

            if let Some(command) = available_commands.iter().find(|cmd| cmd.0 == choice) {
                return Ok(Some(command));
            }
        }
    }
}

/// Returns `None` once stdin is closed.
fn read_line(prompt: &str) -> Result<Option<String>, ReplError> {
    print!("{prompt}");
    stdout().flush()?;

    let mut s = String::new();
    if stdin().read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

/// Empty input keeps the current value, a single `-` clears it.
fn edit_field(label: &str, current: &mut String) -> ReplResult {
    println!("Current: {}", current);
    println!("(Enter keeps the current value, '-' clears it)");
    if let Some(line) = read_line(&format!("> {label}: "))? {
        match line.trim() {
            "" => {}
            "-" => current.clear(),
            _ => *current = line,
        }
    }
    Ok(())
}

fn edit_champions(session: &mut Session) -> ReplResult {
    edit_field("Champions (comma-separated)", &mut session.input.champions_text)
}

fn edit_lanes(session: &mut Session) -> ReplResult {
    edit_field("Lanes (comma-separated)", &mut session.input.lanes_text)
}

fn edit_runes(session: &mut Session) -> ReplResult {
    edit_field("Runes (k:v comma-separated)", &mut session.input.runes_text)
}

fn edit_patch(session: &mut Session) -> ReplResult {
    edit_field("Patch", &mut session.input.patch)
}

fn toggle_side(session: &mut Session) -> ReplResult {
    session.input.blue_side = !session.input.blue_side;
    println!("Now evaluating {}", side_name(session.input.blue_side));
    Ok(())
}

fn side_name(blue_side: bool) -> &'static str {
    match blue_side {
        true => "blue side",
        false => "red side",
    }
}

fn show_draft(session: &mut Session) -> ReplResult {
    let draft = normalize_draft(&session.input);

    println!("Patch {}, {}\n", draft.patch, side_name(draft.blue_side));
    println!("Picks:");
    for (i, champion) in draft.champions.iter().enumerate() {
        let lane = draft.lanes.get(i).map(String::as_str).unwrap_or("-");
        println!("  {:>2}. {:<16} {}", i + 1, champion, lane);
    }
    if draft.lanes.len() > draft.champions.len() {
        println!("  Unassigned lanes: {}", draft.lanes[draft.champions.len()..].join(", "));
    }

    println!("\nRunes:");
    if draft.runes.is_empty() {
        println!("  none");
    }
    for (slot, choice) in &draft.runes {
        println!("  {:<16} {}", format!("{}:", slot), choice);
    }
    Ok(())
}

fn submit(session: &mut Session) -> ReplResult {
    let draft = normalize_draft(&session.input);
    let client = Arc::clone(&session.client);
    session.slot.submit(move || client.predict(&draft));

    println!(
        "Draft submitted ({} request(s) in flight). Check 'Show Result' for the answer.",
        session.slot.in_flight()
    );
    Ok(())
}

fn show_result(session: &mut Session) -> ReplResult {
    session.slot.try_update();

    match session.slot.state() {
        SubmissionState::Idle => println!("Nothing submitted yet."),
        SubmissionState::Submitting => println!("Waiting for the prediction service..."),
        SubmissionState::Succeeded => {}
        SubmissionState::Failed(err) => println!("[!] Prediction failed: {}", err),
    }

    if let Some((result, received_at)) = session.slot.last_result() {
        println!("Win probability: {}", result);
        println!("Received at {}", received_at.format("%H:%M:%S"));
        if let Some(details) = &result.details {
            println!("\nDetails:\n{}", details.pretty(2));
        }
    }

    if session.slot.in_flight() > 0 {
        println!("\n{} request(s) still in flight.", session.slot.in_flight());
    }
    Ok(())
}
