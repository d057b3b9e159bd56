use crate::get_to_writer;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} [OPTIONS] PATH [INPUT]\n\
         \n\
         PATH:  JSONPath expression, e.g. '$.store.book[0].title'\n\
         INPUT: optional input file. When omitted, reads from stdin.\n\
         \n\
         Options:\n\
           -o, --output FILE   Write output to FILE (default stdout)\n\
           -n, --newline       Append a trailing newline to the result\n\
           -h, --help          Show this help\n",
        prog = program
    );
}

struct CliMode {
    path: Option<String>,
    input: Option<String>,
    output: Option<String>,
    newline: bool,
}

fn parse_args() -> CliMode {
    let mut args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "jsonslice".to_string());
    args.remove(0);

    let mut mode = CliMode {
        path: None,
        input: None,
        output: None,
        newline: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help(&program);
                std::process::exit(0);
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Missing FILE for --output");
                    std::process::exit(2);
                }
                mode.output = Some(args[i].clone());
            }
            "-n" | "--newline" => {
                mode.newline = true;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown option: {}", s);
                std::process::exit(2);
            }
            arg => {
                if mode.path.is_none() {
                    mode.path = Some(arg.to_string());
                } else {
                    mode.input = Some(arg.to_string());
                }
            }
        }
        i += 1;
    }
    mode
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mode = parse_args();
    let Some(path) = mode.path else {
        eprintln!("Missing PATH expression");
        std::process::exit(2);
    };

    let doc = match &mode.input {
        Some(p) => fs::read(p)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let mut out_writer: Box<dyn Write> = if let Some(ref o) = mode.output {
        Box::new(BufWriter::new(File::create(o)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    get_to_writer(&doc, &path, &mut out_writer)?;
    if mode.newline {
        out_writer.write_all(b"\n")?;
    }
    out_writer.flush()?;
    Ok(())
}
