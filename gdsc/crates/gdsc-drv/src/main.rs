use gdsc_drv::{parse_args, run, Action, HELP_TEXT, USAGE};

fn main() {
    gdsc_drv::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let action = match parse_args(&args) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: {}", USAGE);
            std::process::exit(1);
        }
    };

    match action {
        Action::Help => {
            print!("{}", HELP_TEXT);
            std::process::exit(0);
        }
        Action::Run(config) => {
            if let Err(e) = run(&config) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
