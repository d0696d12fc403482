use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;
use env_logger::Env;

use opsh::console::Console;
use opsh::handler::ExecRunner;
use opsh::host::SystemShell;
use opsh::session;
use opsh::store::{DEFAULT_SLOT, FsStore};

#[derive(FromArgs)]
/// Operator console: typed commands become flag-dispatched actions carried
/// out by external handlers against a shared process slot.
struct Args {
    /// session root holding the vfs, std and etc trees (default: current directory)
    #[argh(option, short = 'C', default = "String::from(\".\")")]
    root: String,

    /// process slot the action codes are exchanged through
    #[argh(option, default = "DEFAULT_SLOT")]
    slot: u32,

    /// program handler dispatches go through
    #[argh(option, default = "String::from(\"make\")")]
    handler_program: String,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let root = PathBuf::from(&args.root);
    {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        session::login(&root, &mut stdin.lock(), &mut stdout)?;
    }
    if let Some(motd) = session::motd(&root) {
        print!("{motd}");
    }

    let store = FsStore::new(&root, args.slot);
    let handlers = ExecRunner::new(SystemShell::new(&root), args.handler_program);
    let host = SystemShell::new(&root);
    let mut console = Console::new(Box::new(store), Box::new(handlers), Box::new(host), io::stdout());

    if io::stdin().is_terminal() {
        console.repl()
    } else {
        console.run_script(io::stdin().lock())
    }
}
