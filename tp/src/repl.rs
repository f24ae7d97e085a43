//! Interactive chat session

use chrono::NaiveDate;
use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::domain::{ProviderFailure, TripRecord, TripRequest};
use crate::facade::OrchestrationFacade;

/// Interactive trip-planning chat for one user
pub struct ChatSession<'a> {
    facade: &'a OrchestrationFacade,
    user_id: String,
}

impl<'a> ChatSession<'a> {
    /// Create a new chat session
    pub fn new(facade: &'a OrchestrationFacade, user_id: impl Into<String>) -> Self {
        Self {
            facade,
            user_id: user_id.into(),
        }
    }

    /// Run the chat main loop
    pub async fn run(&self) -> Result<()> {
        self.facade.open_session(&self.user_id).await;
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(input);

                    // Handle slash commands
                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_message(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "TripPlanner Chat".bright_cyan().bold());
        println!("Planning for user: {}", self.user_id);
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    async fn handle_slash_command(&self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/plan" => {
                match parse_plan_args(&parts[1..]) {
                    Ok(request) => self.plan(request).await,
                    Err(usage) => println!("{} {}", "?".yellow(), usage),
                }
                SlashResult::Continue
            }
            "/trip" => {
                match self.facade.current_trip(&self.user_id).await {
                    Some(record) => {
                        println!();
                        print!("{}", render_record(&record));
                        println!();
                    }
                    None => println!("{}", "No trip planned yet. Use /plan or just ask.".dimmed()),
                }
                SlashResult::Continue
            }
            "/trips" => {
                self.list_trips().await;
                SlashResult::Continue
            }
            "/clear" | "/c" => {
                self.facade.close_session(&self.user_id).await;
                self.facade.open_session(&self.user_id).await;
                println!("{}", "Conversation cleared.".dimmed());
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:40} Plan a day trip", "/plan <city> <date> <budget> <interest>..".yellow());
        println!("  {:40} Show the current trip", "/trip".yellow());
        println!("  {:40} List stored trips", "/trips".yellow());
        println!("  {:40} Clear conversation history", "/clear".yellow());
        println!("  {:40} Show this help", "/help".yellow());
        println!("  {:40} Exit the chat", "/quit".yellow());
        println!();
        println!("Anything else is sent to the planner as a question.");
        println!();
    }

    /// Plan a trip and print the result
    async fn plan(&self, request: TripRequest) {
        match self.facade.plan_trip(&self.user_id, request).await {
            Ok(planned) => {
                println!();
                print!("{}", render_record(&planned.record));
                if let Err(e) = &planned.store_status {
                    println!("{} trip fact not stored: {}", "Warning:".yellow(), e);
                }
                println!();
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    /// List stored trips for this user
    async fn list_trips(&self) {
        match self.facade.trips_for_user(&self.user_id).await {
            Ok(trips) if trips.is_empty() => println!("{}", "No stored trips.".dimmed()),
            Ok(trips) => {
                println!();
                for fact in &trips {
                    println!(
                        "  {} {} {}",
                        fact.date,
                        fact.city.cyan(),
                        format!("({})", fact.trip_id).dimmed()
                    );
                }
                println!();
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    /// Send a message through the conversation flow
    async fn process_message(&self, message: &str) {
        match self.facade.continue_conversation(&self.user_id, message).await {
            Ok(reply) => {
                println!();
                println!("{reply}");
                println!();
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

/// Parse `/plan` arguments into a trip request
fn parse_plan_args(args: &[&str]) -> Result<TripRequest, String> {
    if args.len() < 4 {
        return Err("usage: /plan <city> <date> <budget> <interest> [interest...]".to_string());
    }

    let city = args[0];
    let date: NaiveDate = args[1]
        .parse()
        .map_err(|_| format!("bad date '{}', expected YYYY-MM-DD", args[1]))?;
    let budget: f64 = args[2].parse().map_err(|_| format!("bad budget '{}'", args[2]))?;
    let interests = args[3..].iter().map(|s| s.to_string()).collect();

    Ok(TripRequest::new(city, date, interests, budget))
}

/// Render a trip record for the terminal, section by section
pub fn render_record(record: &TripRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} on {}  {}\n",
        "Trip:".bold(),
        record.request.city.cyan(),
        record.request.date,
        format!("({})", record.trip_id).dimmed(),
    ));

    match &record.weather {
        Ok(w) => out.push_str(&format!(
            "{} {:.1}\u{00b0}C (feels like {:.1}\u{00b0}C), humidity {}%, {}\n",
            "Weather:".bold(),
            w.temperature_c,
            w.feels_like_c,
            w.humidity_pct,
            w.description,
        )),
        Err(e) => out.push_str(&format!("{} {}\n", "Weather:".bold(), section_failure(e))),
    }

    match &record.news {
        Ok(headlines) if headlines.is_empty() => {
            out.push_str(&format!("{} no headlines today\n", "News:".bold()));
        }
        Ok(headlines) => {
            out.push_str(&format!("{}\n", "News:".bold()));
            for h in headlines {
                out.push_str(&format!("  - {} {}\n", h.title, h.url.dimmed()));
            }
        }
        Err(e) => out.push_str(&format!("{} {}\n", "News:".bold(), section_failure(e))),
    }

    match &record.route {
        Ok(r) => out.push_str(&format!(
            "{} {:.1} km, about {}, {} steps\n",
            "Route:".bold(),
            r.distance_meters / 1000.0,
            format_duration(r.duration_seconds),
            r.steps.len(),
        )),
        Err(e) => out.push_str(&format!("{} {}\n", "Route:".bold(), section_failure(e))),
    }

    match &record.itinerary {
        Ok(text) => {
            out.push_str(&format!("{}\n", "Itinerary:".bold()));
            out.push_str(text);
            out.push('\n');
        }
        Err(e) => out.push_str(&format!("{} {}\n", "Itinerary:".bold(), section_failure(e))),
    }

    out
}

fn section_failure(failure: &ProviderFailure) -> String {
    format!("unavailable ({})", failure.kind).dimmed().to_string()
}

/// Format a duration in seconds as "3h 26m" or "45m"
fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds / 60.0).round() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}
