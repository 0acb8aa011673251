//! A thin harness around the core library: load a FEN (from argv or
//! stdin), then run perft or the demo search and print the result. Not a
//! UCI engine — see the library's own Non-goals.

use mantle::board::Position;
use mantle::logging::init_logging;
use mantle::moves::magic::default_tables;
use mantle::moves::perft::perft_divide;
use mantle::search::search_default;
use std::env;
use std::io::{self, Read};
use std::str::FromStr;

/// Joins `args[start..]` as the FEN if present, otherwise reads one from
/// stdin, falling back to the standard starting position.
fn read_fen(args: &[String], start: usize) -> String {
    if args.len() > start {
        return args[start..].join(" ");
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .expect("failed to read FEN from stdin");
    let trimmed = buf.trim();
    if trimmed.is_empty() {
        mantle::board::STARTING_FEN.to_string()
    } else {
        trimmed.to_string()
    }
}

fn main() {
    init_logging("logs/mantle.log", "info");

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("perft");

    match command {
        "perft" => {
            let depth: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4);
            let fen = read_fen(&args, 3);
            let mut pos = Position::from_str(&fen).expect("invalid FEN");
            perft_divide(&mut pos, default_tables(), depth);
        }
        "search" => {
            let depth: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4);
            let fen = read_fen(&args, 3);
            let mut pos = Position::from_str(&fen).expect("invalid FEN");
            println!("{}", pos.pretty());
            let result = search_default(&mut pos, depth);
            match result.best_move {
                Some(mv) => println!("best move: {} (score {})", mv.to_uci(), result.score),
                None => println!("no legal moves (score {})", result.score),
            }
        }
        "display" => {
            let fen = read_fen(&args, 2);
            let pos = Position::from_str(&fen).expect("invalid FEN");
            println!("{}", pos.pretty());
            println!("{}", pos);
        }
        other => {
            eprintln!("unknown command '{other}', expected perft|search|display");
            std::process::exit(1);
        }
    }
}
