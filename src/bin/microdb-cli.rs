//! Interactive console for microdb
//!
//! Reads one SQL statement per line, executes it against a file-backed
//! engine, and pretty-prints the result. `exit` or `quit` leaves the shell.

use microdb::{DbConfig, JsonFileStore, QueryExecutor, QueryResult, Result, Row, Value};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => interactive_mode(None),
        2 => match args[1].as_str() {
            "--version" | "-v" => {
                println!("microdb v{}", VERSION);
                Ok(())
            }
            "--help" | "-h" => {
                print_help();
                Ok(())
            }
            path => interactive_mode(Some(PathBuf::from(path))),
        },
        _ => {
            print_help();
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"microdb v{} - minimal persistent SQL engine

Usage:
  microdb-cli              open the default database (./microdb_data)
  microdb-cli <data_dir>   open the database at <data_dir>
  microdb-cli --version    print version
  microdb-cli --help       print this help

Supported statements:
  CREATE TABLE name (col [type], ...)
  INSERT INTO name (cols) VALUES (literals)
  SELECT cols FROM name [WHERE col = literal]
  UPDATE name SET col = literal[, ...] [WHERE col = literal]
  DELETE FROM name [WHERE col = literal]
  DROP TABLE name
  SHOW TABLES
  DESCRIBE name

Type 'exit' or 'quit' to leave the shell."#,
        VERSION
    );
}

fn interactive_mode(data_dir: Option<PathBuf>) -> Result<()> {
    let config = match data_dir {
        Some(dir) => DbConfig::with_data_dir(dir),
        None => DbConfig::default(),
    };

    println!("microdb v{}", VERSION);
    println!("Database: {}", config.data_dir.display());
    println!("Type SQL statements, or 'exit' to quit.\n");

    let db: QueryExecutor<JsonFileStore> = microdb::open(&config)?;

    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("microdb> ");
        io::stdout().flush().ok();

        buffer.clear();
        match stdin.lock().read_line(&mut buffer) {
            Ok(0) | Err(_) => break, // EOF
            Ok(_) => {}
        }

        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        match db.execute(line) {
            Ok(result) => display_result(result),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn display_result(result: QueryResult) {
    match result {
        QueryResult::Definition { message } | QueryResult::Modification { message, .. } => {
            println!("{}", message);
        }
        QueryResult::Select { rows } => {
            if rows.is_empty() {
                println!("Empty set");
            } else {
                let columns = column_union(&rows);
                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        columns
                            .iter()
                            .map(|col| row.get(col).map(Value::to_string).unwrap_or_default())
                            .collect()
                    })
                    .collect();
                display_table(&columns, &cells);
            }
        }
        QueryResult::Tables { names } => {
            if names.is_empty() {
                println!("Empty set");
            } else {
                let cells: Vec<Vec<String>> = names.into_iter().map(|n| vec![n]).collect();
                display_table(&["Tables".to_string()], &cells);
            }
        }
        QueryResult::Schema { columns } => {
            let cells: Vec<Vec<String>> = columns
                .into_iter()
                .map(|c| vec![c.name, c.type_name])
                .collect();
            display_table(&["Column".to_string(), "Type".to_string()], &cells);
        }
    }
}

/// Every column name appearing in any row, in first-seen order.
fn column_union(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row.keys() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

fn display_table(columns: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = columns.iter().map(|col| col.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in widths.iter().enumerate() {
            line.push_str(&"─".repeat(width + 2));
            line.push(if i < widths.len() - 1 { mid } else { right });
        }
        println!("{}", line);
    };

    let print_row = |cells: &[String]| {
        let mut line = String::from("│");
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {:width$} │", cell, width = width));
        }
        println!("{}", line);
    };

    border('┌', '┬', '┐');
    print_row(columns);
    border('├', '┼', '┤');
    for row in rows {
        print_row(row);
    }
    border('└', '┴', '┘');

    let count = rows.len();
    println!("{} row(s)", count);
}
