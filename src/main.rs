use std::{env, fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use toyc::{
    ast::printer::AstPrinter,
    context::context::{CompilerCtx, SourceFile},
    errors::errors::{Error, ErrorTip},
    init_tracing,
    interpreter::interpreter::Interpreter,
    type_checker::type_checker::TypeChecker,
};

const USAGE: &str = "usage: toyc <tokenize|parse|check|run> <file>";

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    let command = args[1].as_str();
    let path = PathBuf::from(&args[2]);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args[2].clone());

    let contents = match read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", path.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = CompilerCtx::new();
    let file = ctx.add_file(&path, &file_name, contents);

    let result = match command {
        "tokenize" => tokenize(&mut ctx, &file),
        "parse" => parse(&mut ctx, &file),
        "check" => check(&mut ctx, &file),
        "run" => run(&mut ctx, &file),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            display_error(&error, &file);
            ExitCode::FAILURE
        }
    }
}

fn tokenize(ctx: &mut CompilerCtx, file: &Rc<SourceFile>) -> Result<(), Error> {
    let tokens = ctx.tokenize_all(file)?;

    for token in tokens {
        println!("{}", token.format(ctx)?);
    }

    Ok(())
}

fn parse(ctx: &mut CompilerCtx, file: &Rc<SourceFile>) -> Result<(), Error> {
    let start = Instant::now();
    let parsed = ctx.create_parser(file).parse_file()?;
    eprintln!("Parsed in {:?}", start.elapsed());

    print!("{}", AstPrinter::new().print_file(&parsed));
    Ok(())
}

fn check(ctx: &mut CompilerCtx, file: &Rc<SourceFile>) -> Result<(), Error> {
    let start = Instant::now();
    let parsed = ctx.create_parser(file).parse_file()?;
    eprintln!("Parsed in {:?}", start.elapsed());

    let type_check_start = Instant::now();
    let file_scope = TypeChecker::new().check_file(&parsed)?;
    eprintln!("Type checked in {:?}", type_check_start.elapsed());
    eprintln!("{} functions, no errors", file_scope.definitions.len());

    Ok(())
}

fn run(ctx: &mut CompilerCtx, file: &Rc<SourceFile>) -> Result<(), Error> {
    let parsed = ctx.create_parser(file).parse_file()?;
    let file_scope = TypeChecker::new().check_file(&parsed)?;

    let start = Instant::now();
    Interpreter::new(&file_scope).run_from_entrypoint()?;
    eprintln!("Ran in {:?}", start.elapsed());

    Ok(())
}

fn display_error(error: &Error, file: &SourceFile) {
    /*
        Error: UnknownSymbol (`b` is not declared in this scope)
        -> main.lang
           |
        20 | let a: i32 = b;
           | -------------^
        unknown symbol: b
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }

    let location = match &file.path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => file.name.clone(),
    };
    eprintln!("-> {}", location);

    if let Some(span) = error.get_span() {
        let line_str = span.start.line.to_string();
        let padding = line_str.len() + 2;
        let line_text = file
            .contents
            .lines()
            .nth(span.start.line.saturating_sub(1))
            .unwrap_or_default();

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
        let arrows = span.start.column.saturating_sub(removed_whitespace).max(1);

        eprintln!("{:>padding$}", "|");
        eprintln!("{} | {}", line_str, line_text_removed.trim_end());
        eprintln!("{:>padding$} {:->arrows$}", "|", "^");
    }

    eprintln!("{}", error.message());
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start();
    (trimmed, string.len() - trimmed.len())
}
