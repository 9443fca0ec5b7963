mod command;
mod highscore;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
