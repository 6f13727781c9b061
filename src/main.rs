pub mod api;
pub mod config;
pub mod departures;
pub mod error;
pub mod io;
pub mod journeys;
pub mod status;
pub mod stops;
pub mod structs;
pub mod time;
pub mod transport;
#[cfg(test)]
mod tests;

use api::*;
use config::Config;
use departures::*;
use io::SavedSelections;
use journeys::*;
use status::normalize_status;
use stops::{filter_stops, StopMatch};
use structs::*;
use transport::{ExclusionSpec, TransportType};

use chrono::DateTime;
use chrono_tz::Tz;
use std::{collections::HashSet, error::Error, sync::Arc};
use teloxide::{
    dptree::deps,
    filter_command,
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode::Html},
    utils::{command::BotCommands, html},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Telegram rejects longer messages.
const MESSAGE_LIMIT: usize = 4000;
const MAX_STOP_BUTTONS: usize = 10;
const DEPARTURES_CALLBACK: &str = "dep:";
const TRIP_USAGE: &str =
    "/trip <origin id> <destination id> [YYYY/MM/DD HH:MMam] [ADULT|CHILD|SENIOR|SCHOLAR] [arriveby] [wheelchair]";

#[derive(BotCommands, Clone, Debug)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum Command {
    #[command(description = "Display help menu showing the commands list")]
    Help,
    #[command(description = "Search stops by name, optionally ending with modes: /stops central train")]
    Stops(String),
    #[command(description = "Search stops of a suburb: /suburb epping")]
    Suburb(String),
    #[command(description = "Next departures: /departures <stop id> [2024/06/01 9:30am] [train|bus|...|-bus]")]
    Departures(String),
    #[command(description = "Plan a trip: /trip <origin id> <destination id> [2024/06/01 9:30am] [ADULT|CHILD|SENIOR|SCHOLAR] [arriveby] [wheelchair]")]
    Trip(String),
    #[command(description = "Service alerts for a stop: /status <stop id>")]
    Status(String),
    #[command(description = "Save a stop: /savestop <stop id> <name>")]
    Savestop(String),
    #[command(description = "Save a trip: /savetrip <origin id> <destination id>")]
    Savetrip(String),
    #[command(description = "Show saved stops and trips")]
    Saved,
}

/// Messages answering one update. The keyboard goes with the last one.
struct Reply {
    messages: Vec<String>,
    keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply {
            messages: split_message(&text.into()),
            keyboard: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting trip planner BOT ...");

    let config = Config::from_env()?;
    let planner = Arc::new(TripPlanner::new(&config));
    let saved = Arc::new(SavedSelections::open(&config.data_dir)?);
    log::info!("Saving selections under {}", config.data_dir.display());

    let bot = Bot::from_env();

    let message_handler = Update::filter_message()
        .branch(filter_command::<Command, _>().endpoint(answer));

    let callback_query_handler = Update::filter_callback_query().endpoint(receive_stop);

    let handler = dptree::entry()
        .branch(message_handler)
        .branch(callback_query_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(deps![planner, saved])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    Ok(())
}

async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    planner: Arc<TripPlanner>,
    saved: Arc<SavedSelections>,
) -> HandlerResult {
    log::info!("{:?} from chat {}", cmd, msg.chat.id.0);

    let reply = match cmd {
        Command::Help => Ok(Reply::text(html::escape(&Command::descriptions().to_string()))),
        Command::Stops(args) => search_stops(&planner, &args, false).await,
        Command::Suburb(args) => search_stops(&planner, &args, true).await,
        Command::Departures(args) => departures(&planner, &args).await,
        Command::Trip(args) => trip(&planner, &args).await,
        Command::Status(args) => status(&planner, &args).await,
        Command::Savestop(args) => save_stop(&saved, &args).await,
        Command::Savetrip(args) => save_trip(&planner, &saved, &args).await,
        Command::Saved => list_saved(&saved).await,
    };
    send_reply(&bot, msg.chat.id, reply).await
}

/// A stop button was pressed under a /stops result.
async fn receive_stop(bot: Bot, q: CallbackQuery, planner: Arc<TripPlanner>) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let (Some(data), Some(message)) = (&q.data, &q.message) else {
        return Ok(());
    };
    if let Some(stop_id) = data.strip_prefix(DEPARTURES_CALLBACK) {
        log::info!("Departures button {} from chat {}", stop_id, message.chat.id.0);
        let reply = departures(&planner, stop_id).await;
        send_reply(&bot, message.chat.id, reply).await?;
    }
    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: error::Result<Reply>) -> HandlerResult {
    let Reply { messages, mut keyboard } = match reply {
        Ok(reply) => reply,
        Err(e) => {
            log::warn!("Chat {}: {}", chat_id.0, e);
            Reply::text(format!("❌ {}", html::escape(&e.to_string())))
        }
    };

    let last = messages.len().saturating_sub(1);
    for (i, text) in messages.into_iter().enumerate() {
        let mut request = bot.send_message(chat_id, text).parse_mode(Html);
        if i == last {
            if let Some(kb) = keyboard.take() {
                request = request.reply_markup(kb);
            }
        }
        request.await?;
    }
    Ok(())
}

//////////////////////////////////////////////////////////
// Commands
//////////////////////////////////////////////////////////
async fn search_stops(planner: &TripPlanner, args: &str, suburb: bool) -> error::Result<Reply> {
    let mut words: Vec<&str> = args.split_whitespace().collect();
    // trailing mode names filter the results
    let mut modes = vec![];
    while let Some(mode) = words.last().and_then(|w| TransportType::from_name(w)) {
        modes.push(mode.icon_id());
        words.pop();
    }
    let query = words.join(" ");
    if query.is_empty() {
        return Err(error::Error::InvalidArguments("/stops <name> [train|bus|ferry|...]"));
    }

    let candidates = planner.find_stops(&query, false).await?;
    let matches: Vec<StopMatch> = filter_stops(&candidates, &modes, &query, suburb)
        .filter(|m| DEPARTURES_CALLBACK.len() + m.id.len() <= 64)
        .take(MAX_STOP_BUTTONS)
        .collect();
    log::debug!("{} of {} stops match {:?}", matches.len(), candidates.len(), query);

    if matches.is_empty() {
        return Ok(Reply::text(format!("🔍 No stops found for {}.", html::bold(&html::escape(&query)))));
    }

    let buttons = matches
        .iter()
        .map(|m| (m.name.clone(), format!("{}{}", DEPARTURES_CALLBACK, m.id)))
        .collect();
    let ids: Vec<String> = matches
        .iter()
        .map(|m| match m.coord {
            Some([lat, lon]) => format!(
                "{} {} ({:.4}, {:.4})",
                html::code_inline(&m.id),
                html::escape(&m.name),
                lat,
                lon
            ),
            None => format!("{} {}", html::code_inline(&m.id), html::escape(&m.name)),
        })
        .collect();

    Ok(Reply {
        messages: vec![format!(
            "🚏 Stops matching {}:\n{}\n\nSelect a stop to see its departures:",
            html::bold(&html::escape(&query)),
            ids.join("\n")
        )],
        keyboard: Some(make_inline_keyboard(buttons, 1)),
    })
}

async fn departures(planner: &TripPlanner, args: &str) -> error::Result<Reply> {
    let mut words: Vec<&str> = args.split_whitespace().collect();
    let exclusions = take_exclusions(&mut words)?;
    let (stop_id, reference) = match words.as_slice() {
        [stop_id] => (*stop_id, time::now()),
        [stop_id, date, clock] => (*stop_id, time::parse_local(date, clock)?),
        _ => {
            return Err(error::Error::InvalidArguments(
                "/departures <stop id> [YYYY/MM/DD HH:MMam] [train|bus|...|-bus]",
            ))
        }
    };

    let events = planner.departures(stop_id, &reference, &exclusions).await?;
    let records = match normalize_departures(events.as_deref(), &reference)? {
        Some(records) => records,
        None => {
            return Ok(Reply::text(format!(
                "🚫 No departures found for stop {}.",
                html::code_inline(stop_id)
            )))
        }
    };
    if records.is_empty() {
        return Ok(Reply::text(format!(
            "⌛ Every listed departure from {} has already left.",
            html::code_inline(stop_id)
        )));
    }

    let mut text = String::new();
    for (location, group) in group_by_location(records) {
        let stop_id = group.first().map(|d| d.stop_id.as_str()).unwrap_or_default();
        text.push_str(&format!(
            "🚏 {} {}\n",
            html::bold(&html::escape(&location)),
            html::code_inline(stop_id)
        ));
        for departure in group {
            text.push_str(&format!("{}\n", html::escape(&departure.to_string())));
        }
        text.push('\n');
    }
    Ok(Reply::text(text))
}

async fn trip(planner: &TripPlanner, args: &str) -> error::Result<Reply> {
    let mut words: Vec<&str> = args.split_whitespace().collect();
    let options = take_trip_options(&mut words);
    let request = parse_trip_request(&words)?;
    let (origin, destination, category) = (request.origin, request.destination, request.category);
    let when = request.when.unwrap_or_else(time::now);

    let journeys = planner.trips(origin, destination, &when, &options).await?;
    let journeys = match journeys {
        Some(journeys) if !journeys.is_empty() => journeys,
        _ => return Ok(Reply::text("🚫 No journeys found.")),
    };

    let summaries = summarize_journeys(&journeys, category)?;
    let count = summaries.len();
    let messages = summaries
        .iter()
        .enumerate()
        .flat_map(|(i, summary)| {
            let mut text = format!(
                "{} ({}, {} legs, {} lines)\n{}",
                html::bold(&format!("Journey {}/{}", i + 1, count)),
                category.tag(),
                summary.number_of_legs(),
                summary.number_of_stops(),
                html::escape(&summary.to_string())
            );
            if let Some(link) = map_link(&summary.coords) {
                text.push_str(&format!("\n{}", html::link(&link, "🗺 Map")));
            }
            split_message(&text)
        })
        .collect();

    Ok(Reply { messages, keyboard: None })
}

async fn status(planner: &TripPlanner, args: &str) -> error::Result<Reply> {
    let stop_id = match args.split_whitespace().collect::<Vec<_>>().as_slice() {
        [stop_id] => stop_id.to_string(),
        _ => return Err(error::Error::InvalidArguments("/status <stop id>")),
    };

    let messages = normalize_status(&planner.status(&stop_id).await?)?;
    if messages.is_empty() {
        return Ok(Reply::text(format!(
            "✅ No current alerts for {}.",
            html::code_inline(&stop_id)
        )));
    }

    let text: Vec<String> = messages
        .iter()
        .map(|m| html::escape(&m.to_string()))
        .collect();
    Ok(Reply::text(text.join("\n\n")))
}

async fn save_stop(saved: &SavedSelections, args: &str) -> error::Result<Reply> {
    let (id, name) = match args.trim().split_once(char::is_whitespace) {
        Some((id, name)) if !name.trim().is_empty() => (id, name.trim()),
        _ => return Err(error::Error::InvalidArguments("/savestop <stop id> <name>")),
    };

    saved
        .save_stop(SavedStop {
            id: id.to_string(),
            name: name.to_string(),
        })
        .await?;
    Ok(Reply::text(format!("⭐ Saved {}.", html::bold(&html::escape(name)))))
}

async fn save_trip(planner: &TripPlanner, saved: &SavedSelections, args: &str) -> error::Result<Reply> {
    let (origin, destination) = match args.split_whitespace().collect::<Vec<_>>().as_slice() {
        [origin, destination] => (origin.to_string(), destination.to_string()),
        _ => return Err(error::Error::InvalidArguments("/savetrip <origin id> <destination id>")),
    };

    let trip = SavedTrip {
        origin: resolve_stop(planner, &origin).await?,
        destination: resolve_stop(planner, &destination).await?,
    };
    let text = format!(
        "⭐ Saved trip {} -> {}.",
        html::bold(&html::escape(&trip.origin.name)),
        html::bold(&html::escape(&trip.destination.name))
    );
    saved.save_trip(trip).await?;
    Ok(Reply::text(text))
}

async fn list_saved(saved: &SavedSelections) -> error::Result<Reply> {
    let stops = saved.stops().await?;
    let trips = saved.trips().await?;
    if stops.is_empty() && trips.is_empty() {
        return Ok(Reply::text("Nothing saved yet. Use /savestop or /savetrip."));
    }

    let mut text = String::from("⭐ Saved stops:\n");
    for stop in &stops {
        text.push_str(&format!("{} {}\n", html::code_inline(&stop.id), html::escape(&stop.name)));
    }
    text.push_str("\n⭐ Saved trips:\n");
    for trip in &trips {
        text.push_str(&format!(
            "{} -> {}  ({} {})\n",
            html::escape(&trip.origin.name),
            html::escape(&trip.destination.name),
            html::code_inline(&trip.origin.id),
            html::code_inline(&trip.destination.id)
        ));
    }
    Ok(Reply::text(text))
}

/// Looks up the display name of a stop id.
async fn resolve_stop(planner: &TripPlanner, id: &str) -> error::Result<SavedStop> {
    let location = planner
        .find_stops(id, true)
        .await?
        .into_iter()
        .next()
        .ok_or(error::Error::InvalidArguments("unknown stop id"))?;
    Ok(SavedStop {
        id: id.to_string(),
        name: location.name,
    })
}

/// Pops trailing mode words: `train bus` keeps only those modes, `-bus`
/// leaves buses out.
fn take_exclusions(words: &mut Vec<&str>) -> error::Result<ExclusionSpec> {
    let mut keep = HashSet::new();
    let mut exclude = None;
    while let Some(word) = words.last() {
        if let Some(mode) = word.strip_prefix('-').and_then(TransportType::from_name) {
            if mode.exclusion_param().is_none() {
                return Err(error::Error::InvalidArguments("walking cannot be excluded"));
            }
            if exclude.replace(mode).is_some() {
                return Err(error::Error::InvalidArguments("only one mode can be excluded"));
            }
        } else if let Some(mode) = TransportType::from_name(word) {
            keep.insert(mode);
        } else {
            break;
        }
        words.pop();
    }

    match (exclude, keep.is_empty()) {
        (None, true) => Ok(ExclusionSpec::None),
        (None, false) => Ok(ExclusionSpec::AllExcept(keep)),
        (Some(mode), true) => Ok(ExclusionSpec::OnlyExclude(mode)),
        (Some(_), false) => Err(error::Error::InvalidArguments(
            "either list the modes to keep or exclude one with -mode",
        )),
    }
}

/// Positional `/trip` arguments once the flags are popped.
#[derive(Debug, PartialEq)]
struct TripRequest<'a> {
    origin: &'a str,
    destination: &'a str,
    /// `None` plans from now
    when: Option<DateTime<Tz>>,
    category: FareCategory,
}

fn parse_trip_request<'a>(words: &[&'a str]) -> error::Result<TripRequest<'a>> {
    let (origin, destination, rest) = match words {
        [origin, destination, rest @ ..] => (*origin, *destination, rest),
        _ => return Err(error::Error::InvalidArguments(TRIP_USAGE)),
    };
    let (when, category) = match rest {
        [] => (None, None),
        [category] => (None, Some(*category)),
        [date, clock] => (Some(time::parse_local(date, clock)?), None),
        [date, clock, category] => (Some(time::parse_local(date, clock)?), Some(*category)),
        _ => return Err(error::Error::InvalidArguments(TRIP_USAGE)),
    };

    Ok(TripRequest {
        origin,
        destination,
        when,
        category: match category {
            Some(category) => category.parse()?,
            None => FareCategory::default(),
        },
    })
}

/// Pops the `arriveby` and `wheelchair` flags, wherever they appear.
fn take_trip_options(words: &mut Vec<&str>) -> TripOptions {
    let mut options = TripOptions::default();
    words.retain(|word| match word.to_lowercase().as_str() {
        "arriveby" => {
            options.arrive_by = true;
            false
        }
        "wheelchair" => {
            options.wheelchair = true;
            false
        }
        _ => true,
    });
    options
}

/// Directions link through the first and last coordinates of a journey.
fn map_link(coords: &[Coord]) -> Option<String> {
    let ([from_lat, from_lon], [to_lat, to_lon]) = (coords.first()?, coords.last()?);
    Some(format!(
        "https://www.google.com/maps/dir/{},{}/{},{}",
        from_lat, from_lon, to_lat, to_lon
    ))
}

//////////////////////////////////////////////////////////
// Keyboards
//////////////////////////////////////////////////////////
/// Creates a keyboard of callback buttons, `chunks` per row.
fn make_inline_keyboard(buttons: Vec<(String, String)>, chunks: usize) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = vec![];

    for values in buttons.chunks(chunks) {
        let row = values
            .iter()
            .map(|(text, data)| InlineKeyboardButton::callback(text.to_owned(), data.to_owned()))
            .collect();

        keyboard.push(row);
    }

    InlineKeyboardMarkup::new(keyboard)
}

/// Splits `text` on line breaks into messages Telegram accepts. Lines too
/// long for one message are cut on char boundaries.
fn split_message(text: &str) -> Vec<String> {
    let mut messages = vec![];
    let mut current = String::new();
    for piece in text.lines().flat_map(|line| split_line(line, MESSAGE_LIMIT - 1)) {
        if !current.is_empty() && current.len() + piece.len() + 1 > MESSAGE_LIMIT {
            messages.push(std::mem::take(&mut current));
        }
        current.push_str(piece);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        messages.push(current);
    }
    messages
}

/// Cuts `line` into pieces of at most `max` bytes.
fn split_line(line: &str, max: usize) -> Vec<&str> {
    let mut pieces = vec![];
    let mut start = 0;
    for (i, c) in line.char_indices() {
        if i + c.len_utf8() - start > max {
            pieces.push(&line[start..i]);
            start = i;
        }
    }
    pieces.push(&line[start..]);
    pieces
}
