use env_logger::Env;
use log::LevelFilter;
use neto::compiler;
use std::env;
use std::process;

fn main() {
    let command = compiler::Command::new();
    let result = compiler::parse_options(env::args()).and_then(|options| {
        init_logger(options.verbose());
        command.run(&options)
    });

    match result {
        Ok(output) => {
            print!("{}", output)
        }
        Err(err) => {
            println!("REJECTED");
            println!("{}", err);
            process::exit(1);
        }
    };
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));

    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}
