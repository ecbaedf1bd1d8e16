//! xs-client: animated maze pathfinding in the terminal.
//!
//! ```text
//! xs-client [+set <name> <value>]...
//! ```

use std::error::Error;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use xs_client::{
    ClientConfig, Command, Console, Controller, DEFAULT_CONFIG, FrameClock, TermRenderer, Timer,
    Viewport,
};
use xs_paths::SearchStatus;

/// Console lines shown under the maze.
const CONSOLE_LINES: usize = 6;

fn main() -> Result<(), Box<dyn Error>> {
    let console = Console::default();
    console.install(log::LevelFilter::Info)?;

    let config = load_config()?;
    log::set_max_level(config.log_level());

    let seed = if config.seed == 0 {
        rand::rng().random::<u64>()
    } else {
        config.seed
    };
    log::info!("seed {seed}");

    let mut controller = Controller::new(config.clone(), StdRng::seed_from_u64(seed))?;
    if config.headless {
        console.set_echo(true);
        run_headless(&mut controller)
    } else {
        run_terminal(&mut controller, &console, &config)
    }
}

fn load_config() -> Result<ClientConfig, Box<dyn Error>> {
    let mut config = ClientConfig::default();
    let path = Path::new(DEFAULT_CONFIG);
    if path.exists() {
        let script = std::fs::read_to_string(path)?;
        config.exec(&script)?;
        log::debug!("execing {DEFAULT_CONFIG}");
    }
    config.apply_args(std::env::args().skip(1))?;
    Ok(config)
}

fn run_headless(controller: &mut Controller<StdRng>) -> Result<(), Box<dyn Error>> {
    let maze = controller.initialize()?;
    let grid = controller.grid();
    let limit = (grid.width() * grid.height()) as usize;
    let status = controller.finish(limit);

    print!("{}", controller.grid().print_maze());
    println!(
        "start {} ({}), goal {} ({})",
        maze.start, maze.start_opening, maze.goal, maze.goal_opening
    );
    let steps = controller.search().steps();
    match status {
        SearchStatus::Found => {
            let route: Vec<String> = controller.path().iter().map(|p| p.to_string()).collect();
            println!("path found in {steps} steps: {}", route.join(" "));
        }
        SearchStatus::NoPath => println!("no path after {steps} steps"),
        _ => println!("search stopped after {steps} steps"),
    }
    Ok(())
}

fn run_terminal(
    controller: &mut Controller<StdRng>,
    console: &Console,
    config: &ClientConfig,
) -> Result<(), Box<dyn Error>> {
    let mut term = TermRenderer::new();
    term.init()?;
    let result = frame_loop(&mut term, controller, console, config);
    term.close();
    result
}

fn frame_loop(
    term: &mut TermRenderer,
    controller: &mut Controller<StdRng>,
    console: &Console,
    config: &ClientConfig,
) -> Result<(), Box<dyn Error>> {
    let viewport = Viewport::new(config.vid_width, config.vid_height);
    let console_top = u16::try_from(config.vid_height).unwrap_or(u16::MAX);
    let mut clock = FrameClock::new(config.framerate);
    let mut timer = Timer::new();

    controller.initialize()?;
    loop {
        match term.poll(clock.until_next())? {
            Some(Command::Quit) => return Ok(()),
            Some(Command::Restart) => {
                log::info!("restarting");
                controller.initialize()?;
            }
            Some(Command::Step) => {
                controller.step();
            }
            Some(Command::PrintMaze) => {
                for row in controller.grid().print_maze().lines() {
                    log::info!("{row}");
                }
            }
            None => {}
        }

        clock.accumulate(timer.restart());
        while let Some(game_time) = clock.next_tick() {
            controller.advance(game_time);
        }

        controller.render(viewport, term);
        term.draw_text(console_top, &console.recent(CONSOLE_LINES))?;
        term.flush()?;
    }
}
