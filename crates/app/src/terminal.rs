//! Line-oriented terminal front-end driving a quiz session.

use std::io::{self, BufRead, Write};

use quiz_core::evaluate;
use quiz_core::model::display_order;
use services::error::{GatewayError, SessionError};
use services::sessions::{QuizLoopService, QuizSession, SessionState};

/// Drive the session until the user quits.
///
/// # Errors
///
/// Returns an error only for I/O failures on stdin/stdout; quiz-level
/// failures are rendered and the loop continues.
pub async fn run(
    loop_svc: &QuizLoopService,
    mut session: QuizSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match session.state() {
            SessionState::Answering(index) => {
                render_question(&session, index);
                if !answer_loop(loop_svc, &mut session, &mut lines).await? {
                    return Ok(());
                }
            }
            SessionState::Reviewing => {
                if !review_loop(loop_svc, &mut session, &mut lines)? {
                    return Ok(());
                }
            }
        }
    }
}

fn read_command(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<String>, io::Error> {
    print!("> ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_owned())),
        None => Ok(None),
    }
}

fn render_question(session: &QuizSession, index: usize) {
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();

    println!();
    println!(
        "── Study {} of {} ({} answered) ─ {}",
        index + 1,
        progress.total,
        progress.answered,
        question.example()
    );
    println!();
    println!("Study Description");
    println!("  {}", question.study_description());
    if !question.methodology1().is_empty() || !question.methodology2().is_empty() {
        println!("Methodology");
        for fragment in [question.methodology1(), question.methodology2()] {
            if !fragment.is_empty() {
                println!("  {fragment}");
            }
        }
    }
    if !question.results1().is_empty() || !question.results2().is_empty() {
        println!("Results");
        for fragment in [question.results1(), question.results2()] {
            if !fragment.is_empty() {
                println!("  {fragment}");
            }
        }
    }
    println!();
    println!("Select the level of explanation that best describes this study:");
    for (position, option_index) in ordered_options(session, index).iter().enumerate() {
        let option = &session.bank().options()[*option_index];
        println!(
            "  [{}] {} - {}",
            position + 1,
            option.title(),
            option.description()
        );
    }
}

fn ordered_options(session: &QuizSession, index: usize) -> Vec<usize> {
    display_order(index, session.bank().options().len())
}

/// Returns `false` when the user quit. `true` means the session state
/// changed and the outer loop should re-render.
async fn answer_loop(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        let index = session.current_index();
        let option_count = session.bank().options().len();
        println!();
        println!("[1-{option_count}] select an option · b back · r restart · q quit");

        let Some(command) = read_command(lines)? else {
            return Ok(false);
        };
        match command.as_str() {
            "q" => return Ok(false),
            "r" => {
                loop_svc.restart(session);
                return Ok(true);
            }
            "b" => match session.retreat() {
                Ok(_) => return Ok(true),
                Err(SessionError::AtStart) => println!("Already at the first study."),
                Err(err) => println!("{err}"),
            },
            other => match other.parse::<usize>() {
                Ok(choice) if (1..=option_count).contains(&choice) => {
                    let order = ordered_options(session, index);
                    let key = session.bank().options()[order[choice - 1]].key().to_owned();
                    session.select_option(&key)?;

                    let Some(question) = session.current_question() else {
                        continue;
                    };
                    if !evaluate::is_correct(question, &key) {
                        println!("✗ Not quite - try another option.");
                        continue;
                    }

                    println!("✓ Correct.");
                    println!("Explain your reasoning (minimum 10 characters):");
                    let Some(reasoning) = read_command(lines)? else {
                        return Ok(false);
                    };
                    session.edit_reasoning(reasoning)?;

                    if advance(loop_svc, session).await? {
                        return Ok(true);
                    }
                }
                _ => println!("Unrecognized input: {other}"),
            },
        }
    }
}

/// Attempt the forward transition. Returns `true` when the state moved.
async fn advance(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
) -> Result<bool, Box<dyn std::error::Error>> {
    let on_final = session.current_index() + 1 == session.bank().len();
    if on_final {
        // Blocks input for the write-then-read window; no double submission.
        println!("Saving your responses…");
    }

    match loop_svc.advance(session).await {
        Ok(outcome) => {
            if outcome.is_reviewing && outcome.peers_unavailable {
                println!("Peer responses are unavailable right now.");
            }
            Ok(true)
        }
        Err(SessionError::GateNotMet { .. }) => {
            println!("Reasoning must be at least 10 characters.");
            Ok(false)
        }
        Err(SessionError::Gateway(GatewayError::NotConfigured)) => {
            println!("Submissions are not configured; your answers cannot be saved.");
            println!("(r to restart, q to quit)");
            Ok(false)
        }
        Err(SessionError::Gateway(err)) => {
            println!("Saving failed: {err}");
            println!("Your answers are kept - try again.");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

fn render_review_tab(session: &QuizSession, tab: usize) {
    let Some(question) = session.bank().question(tab) else {
        return;
    };

    println!();
    println!("── Review - Study {} ─ {}", tab + 1, question.example());
    println!("  {}", question.study_description());

    let level = question.level_of_explanation();
    match session
        .bank()
        .options()
        .iter()
        .find(|option| option.key() == level)
    {
        Some(option) => println!("Correct answer: {} - {}", option.title(), option.description()),
        None => println!("Correct answer: {level}"),
    }

    println!();
    println!("Other reasonings for this study:");
    let reasonings = session.peer_feed().reasonings_for(tab);
    if reasonings.is_empty() {
        println!("  No other reasoning available for this study.");
    } else {
        for reasoning in reasonings {
            println!("  · {reasoning}");
        }
    }
}

/// Returns `false` when the user quit.
fn review_loop(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let total = session.bank().len();
    println!();
    println!(
        "Done - your responses are saved. {} peer submission(s) loaded.",
        session.peer_feed().len()
    );

    let mut tab = 0;
    render_review_tab(session, tab);
    loop {
        println!();
        println!("[1-{total}] study tab · s start over · q quit");
        let Some(command) = read_command(lines)? else {
            return Ok(false);
        };
        match command.as_str() {
            "q" => return Ok(false),
            "s" => {
                loop_svc.restart(session);
                return Ok(true);
            }
            other => match other.parse::<usize>() {
                Ok(choice) if (1..=total).contains(&choice) => {
                    tab = choice - 1;
                    render_review_tab(session, tab);
                }
                _ => println!("Unrecognized input: {other}"),
            },
        }
    }
}
