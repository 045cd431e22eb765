use anyhow::Context;
use farmgrid_core::{
    Catalog, Event, EventBus, Game, GameConfig, GameError, MoveState, PlaceOutcome, Pos,
    RejectReason, RngState,
};
use farmgrid_data::{builtin_catalog, default_save_path, load_assets, load_game, save_game};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 0xC0FFEE;
const LOG_ENV: &str = "FARMGRID_LOG";

#[derive(Debug, Clone)]
struct CliOptions {
    seed: Option<u64>,
    assets: PathBuf,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut seed = None;
    let mut assets = PathBuf::from("assets");
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    CliOptions { seed, assets }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(&options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn load_rules(assets: &Path) -> anyhow::Result<(Catalog, GameConfig)> {
    if assets.exists() {
        return load_assets(assets);
    }
    tracing::warn!(path = %assets.display(), "assets directory missing, using builtin data");
    Ok((builtin_catalog()?, GameConfig::default()))
}

struct Session {
    game: Game,
    seed: u64,
    events: EventBus,
}

fn run(options: &CliOptions) -> anyhow::Result<()> {
    let (catalog, config) = load_rules(&options.assets)?;
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    let mut events = EventBus::default();
    let game = Game::new(catalog, config, RngState::from_seed(seed), &mut events);
    let mut session = Session { game, seed, events };

    println!("farmgrid (seed={seed})");
    print_help();
    drain_events(&mut session);
    print_board(&session.game);
    print_hand(&session.game);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", prompt_text(&session.game));
        io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read command")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        match cmd {
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            "hand" => print_hand(&session.game),
            "board" | "b" => print_board(&session.game),
            "deck" => print_deck(&session.game),
            "cards" => print_cards(session.game.catalog()),
            "place" | "p" => cmd_place(&mut session, &args),
            "pick" => cmd_pick(&mut session, &args),
            "cancel" => {
                if session.game.state().move_state.is_active() {
                    session.game.cancel_move(&mut session.events);
                } else {
                    println!("not in move mode");
                }
            }
            "inspect" | "i" => cmd_inspect(&session, &args),
            "hover" => cmd_hover(&session, &args),
            "end" => session.game.end_game(&mut session.events),
            "new" => {
                session.game.restart(&mut session.events);
                drain_events(&mut session);
                print_board(&session.game);
                print_hand(&session.game);
                continue;
            }
            "save" => cmd_save(&session, &args),
            "load" => cmd_load(&mut session, &args),
            _ => println!("unknown command '{cmd}', type 'help'"),
        }
        drain_events(&mut session);
        if session.game.state().is_stalled() && !session.game.state().ended {
            println!(
                "no more moves: final score {} (type 'end' to finish)",
                session.game.score()
            );
        }
    }
    Ok(())
}

fn cmd_place(session: &mut Session, args: &[&str]) {
    if session.game.state().move_state.is_active() {
        println!("move mode active: use 'pick <row> <col>' or 'cancel'");
        return;
    }
    let (slot, pos) = match parse_slot_and_pos(args) {
        Ok(parsed) => parsed,
        Err(err) => {
            println!("usage: place <hand#> <row> <col> ({err})");
            return;
        }
    };
    let Some(card) = session.game.state().hand.cards.get(slot).map(|card| card.id) else {
        println!("no card at hand index {slot}");
        return;
    };
    match session.game.place_card(pos, card, &mut session.events) {
        Ok(outcome) => report_outcome(&session.game, &outcome),
        Err(err) => print_game_error(&err),
    }
}

fn cmd_pick(session: &mut Session, args: &[&str]) {
    if !session.game.state().move_state.is_active() {
        println!("not in move mode: play a swap card first");
        return;
    }
    let pos = match parse_pos(args) {
        Ok(pos) => pos,
        Err(err) => {
            println!("usage: pick <row> <col> ({err})");
            return;
        }
    };
    match session.game.select_cell(pos, &mut session.events) {
        Ok(outcome) => report_outcome(&session.game, &outcome),
        Err(err) => print_game_error(&err),
    }
}

fn cmd_inspect(session: &Session, args: &[&str]) {
    let pos = match parse_pos(args) {
        Ok(pos) => pos,
        Err(err) => {
            println!("usage: inspect <row> <col> ({err})");
            return;
        }
    };
    match session.game.inspect_tile(pos) {
        Ok(Some(tile)) => {
            println!("{} {} at {}", tile.name, tile.card.key, tile.pos);
            println!("  base {}  stored {}", tile.base_points, tile.points);
            print_synergy_lines(&tile.synergy.descriptors, tile.synergy.bonus);
        }
        Ok(None) => println!("{pos} is empty"),
        Err(err) => print_game_error(&err),
    }
}

fn cmd_hover(session: &Session, args: &[&str]) {
    let (slot, pos) = match parse_slot_and_pos(args) {
        Ok(parsed) => parsed,
        Err(err) => {
            println!("usage: hover <hand#> <row> <col> ({err})");
            return;
        }
    };
    let Some(card) = session.game.state().hand.cards.get(slot) else {
        println!("no card at hand index {slot}");
        return;
    };
    match session.game.describe_synergies(pos, &card.key) {
        Ok(report) => {
            println!("{} at {}:", card.key, pos);
            if !session.game.state().grid.is_empty(pos) {
                println!("  (occupied)");
            }
            print_synergy_lines(&report.descriptors, report.bonus);
        }
        Err(err) => print_game_error(&err),
    }
}

fn cmd_save(session: &Session, args: &[&str]) {
    let Some(path) = parse_optional_path(args) else {
        println!("save path unavailable");
        return;
    };
    match save_game(&path, session.seed, session.game.catalog(), session.game.state()) {
        Ok(()) => println!("saved game: {} (seed={})", path.display(), session.seed),
        Err(err) => println!("error: {err:#}"),
    }
}

fn cmd_load(session: &mut Session, args: &[&str]) {
    let Some(path) = parse_optional_path(args) else {
        println!("save path unavailable");
        return;
    };
    let saved = match load_game(&path, session.game.catalog()) {
        Ok(saved) => saved,
        Err(err) => {
            println!("error: {err:#}");
            return;
        }
    };
    let resumed = Game::resume(
        session.game.catalog().clone(),
        session.game.config().clone(),
        RngState::from_seed(saved.seed),
        saved.state,
    );
    match resumed {
        Ok(game) => {
            session.game = game;
            session.seed = saved.seed;
            println!("loaded game: {} (seed={})", path.display(), saved.seed);
            print_board(&session.game);
            print_hand(&session.game);
        }
        Err(err) => print_game_error(&err),
    }
}

fn report_outcome(game: &Game, outcome: &PlaceOutcome) {
    match outcome {
        PlaceOutcome::EnteredMoveMode { .. } => {
            println!("move mode: 'pick <row> <col>' a tile to move, or 'cancel'")
        }
        PlaceOutcome::SourceSelected { source } => {
            println!("moving {source}: 'pick <row> <col>' an empty destination")
        }
        PlaceOutcome::Placed(_) | PlaceOutcome::CompletedMove(_) => print_board(game),
        _ => {}
    }
}

fn drain_events(session: &mut Session) {
    let catalog = session.game.catalog();
    for event in session.events.drain() {
        println!("event: {}", format_event(catalog, &event));
    }
}

fn format_event(catalog: &Catalog, event: &Event) -> String {
    let name = |key: &str| {
        catalog
            .get(key)
            .map(|def| def.name.clone())
            .unwrap_or_else(|_| key.to_string())
    };
    match event {
        Event::GameStarted { deck } => format!("new game, {deck} cards in deck"),
        Event::HandDealt { count } => format!("drew {count}"),
        Event::CardPlaced {
            key,
            pos,
            points,
            ability_bonus,
            score,
            ..
        } => {
            if *ability_bonus != 0 {
                format!(
                    "{} at {pos} for {points} (ability +{ability_bonus}), score {score}",
                    name(key)
                )
            } else {
                format!("{} at {pos} for {points}, score {score}", name(key))
            }
        }
        Event::SynergyHighlights { highlights, .. } => {
            let cells: Vec<String> = highlights
                .iter()
                .map(|light| {
                    if light.special {
                        format!("{}*+{}", light.pos, light.bonus)
                    } else {
                        format!("{}+{}", light.pos, light.bonus)
                    }
                })
                .collect();
            format!("synergy from {}", cells.join(" "))
        }
        Event::TileCleared { pos, key, points } => {
            format!("{} cleared from {pos} (-{points})", name(key))
        }
        Event::MoveModeEntered { .. } => "move mode entered".to_string(),
        Event::MoveSourceSelected { pos } => format!("picked up {pos}"),
        Event::MoveCompleted {
            from,
            to,
            points,
            score,
        } => format!("moved {from} -> {to}, now {points}, score {score}"),
        Event::MoveCancelled => "move cancelled".to_string(),
        Event::PlacementRejected { pos, reason } => {
            let reason = match reason {
                RejectReason::Occupied => "tile occupied",
                RejectReason::GameEnded => "game has ended",
                RejectReason::EmptySource => "nothing to move there",
            };
            format!("rejected at {pos}: {reason}")
        }
        Event::GameEnded { score } => format!("game over, final score {score}"),
    }
}

fn prompt_text(game: &Game) -> String {
    let state = game.state();
    let mode = match state.move_state {
        MoveState::Idle if state.ended => "ended",
        MoveState::Idle => "play",
        MoveState::AwaitingSource => "move:from",
        MoveState::AwaitingDestination { .. } => "move:to",
    };
    format!("[{mode} score={}]> ", state.score)
}

fn print_help() {
    println!("commands:");
    println!("  hand | board | deck | cards");
    println!("  place <hand#> <row> <col>   play a hand card");
    println!("  pick <row> <col>            choose tiles while moving");
    println!("  cancel                      leave move mode");
    println!("  inspect <row> <col>         tile details");
    println!("  hover <hand#> <row> <col>   preview synergies");
    println!("  end | new                   finish or restart");
    println!("  save [path] | load [path]");
    println!("  help | quit");
}

fn print_board(game: &Game) {
    let state = game.state();
    let size = state.grid.size();
    let source = match state.move_state {
        MoveState::AwaitingDestination { source } => Some(source),
        _ => None,
    };
    print!("     ");
    for col in 0..size {
        print!("{:^11}", col);
    }
    println!();
    for row in 0..size {
        print!("{:>3}  ", row);
        for col in 0..size {
            let pos = Pos::new(row, col);
            let marker = if source == Some(pos) { '>' } else { ' ' };
            match state.grid.get(pos) {
                Some(cell) => {
                    let key: String = cell.card.key.chars().take(6).collect();
                    print!("{marker}{:<6}{:>3} ", key, cell.points);
                }
                None => print!("{marker}{:^9} ", "."),
            }
        }
        println!();
    }
    println!(
        "score {}  filled {}/{}",
        state.score,
        state.grid.filled_count(),
        size * size
    );
}

fn print_hand(game: &Game) {
    let state = game.state();
    println!("== Hand == ({} cards)", state.hand.len());
    println!("{:>4}  {:<16} {:>5}  {:<9} ability", "idx", "card", "base", "category");
    for (idx, card) in state.hand.cards.iter().enumerate() {
        match game.catalog().get(&card.key) {
            Ok(def) => println!(
                "{:>4}  {:<16} {:>5}  {:<9} {}",
                idx,
                format!("{} {}", def.emoji, def.name),
                def.base_points,
                def.category.id(),
                def.ability.map_or("-", |ability| ability.id())
            ),
            Err(err) => println!("{:>4}  {:<16} {err}", idx, card.key),
        }
    }
}

fn print_deck(game: &Game) {
    let deck = &game.state().deck;
    println!("draw pile: {}", deck.remaining());
    println!("discard pile: {}", deck.discard.len());
}

fn print_cards(catalog: &Catalog) {
    println!(
        "{:<16} {:<16} {:>5}  {:<9} {:<26} rarity",
        "key", "name", "base", "category", "ability"
    );
    for def in catalog.iter() {
        println!(
            "{:<16} {:<16} {:>5}  {:<9} {:<26} {:?}",
            def.key,
            def.name,
            def.base_points,
            def.category.id(),
            def.ability.map_or("-", |ability| ability.id()),
            def.rarity
        );
    }
}

fn print_synergy_lines(descriptors: &[String], bonus: i64) {
    if descriptors.is_empty() {
        println!("  no synergies");
        return;
    }
    for line in descriptors {
        println!("  {line}");
    }
    println!("  total synergy +{bonus}");
}

fn print_game_error(err: &GameError) {
    println!("error: {err}");
}

fn parse_index(value: Option<&&str>, what: &str) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("missing {what}"))?;
    value
        .parse::<usize>()
        .map_err(|_| format!("invalid {what} '{value}'"))
}

fn parse_pos(args: &[&str]) -> Result<Pos, String> {
    let row = parse_index(args.first(), "row")?;
    let col = parse_index(args.get(1), "col")?;
    Ok(Pos::new(row, col))
}

fn parse_slot_and_pos(args: &[&str]) -> Result<(usize, Pos), String> {
    let slot = parse_index(args.first(), "hand index")?;
    let pos = parse_pos(args.get(1..).unwrap_or(&[]))?;
    Ok((slot, pos))
}

fn parse_optional_path(args: &[&str]) -> Option<PathBuf> {
    args.first().map(PathBuf::from).or_else(default_save_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse_seed_and_assets() {
        let args: Vec<String> = ["--seed", "42", "--assets", "data"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        let options = parse_cli_options(&args);
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.assets, PathBuf::from("data"));
    }

    #[test]
    fn slot_and_position_parse() {
        assert_eq!(parse_slot_and_pos(&["2", "1", "4"]), Ok((2, Pos::new(1, 4))));
        assert!(parse_slot_and_pos(&["2", "1"]).is_err());
        assert!(parse_pos(&["x", "1"]).is_err());
    }

    #[test]
    fn rejection_events_read_plainly() {
        let catalog = builtin_catalog().expect("catalog");
        let text = format_event(
            &catalog,
            &Event::PlacementRejected {
                pos: Pos::new(0, 1),
                reason: RejectReason::Occupied,
            },
        );
        assert_eq!(text, "rejected at (0, 1): tile occupied");
    }
}
