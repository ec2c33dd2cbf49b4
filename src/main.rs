use clap::{App, Arg, ArgMatches};
use std::{fs, io, path::Path, process};

use nanomorpho::{compile, print_error, Source, DESCRIPTION, NAME, VERSION};

fn main() -> Result<(), io::Error> {
    let args = parse_args();

    let stderr = io::stderr();
    let mut err_writer = stderr.lock();

    let input = args.value_of("source-file").unwrap();
    if !input.ends_with(".nm") {
        print_error(
            &format!("error: input file must match *.nm, got '{}'", input),
            &mut err_writer,
        )?;
        process::exit(1);
    }

    let output = if let Some(out) = args.value_of("output") {
        out.trim().to_owned()
    } else {
        // replace the .nm ending
        format!("{}.masm", input.split_at(input.len() - 3).0)
    };

    if !output.ends_with(".masm") {
        print_error(
            &format!("error: output file must match *.masm, got '{}'", output),
            &mut err_writer,
        )?;
        process::exit(1);
    }

    let unit = match Path::new(&output).file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => stem.to_owned(),
        None => "out".to_owned(),
    };

    let code = fs::read_to_string(input)?;
    let source = Source::new(input, &code);

    match compile(&source, &unit) {
        Ok(lines) => {
            fs::write(&output, lines.join("\n") + "\n")?;
            println!("Compiled {}", output);
            Ok(())
        }
        Err(err) => {
            print_error(&err.to_string(), &mut err_writer)?;
            process::exit(1);
        }
    }
}

pub fn parse_args<'a>() -> ArgMatches<'a> {
    App::new(NAME)
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("file")
                .help("the output file")
                .takes_value(true),
        )
        .arg(Arg::with_name("source-file").required(true))
        .get_matches()
}
