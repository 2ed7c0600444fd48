use std::path::PathBuf;

use atelier::app::WorkspaceApp;
use atelier::logging;

fn main() -> std::io::Result<()> {
    let _logging = logging::init();

    let root = std::env::args().nth(1).map(PathBuf::from);

    let mut app = WorkspaceApp::new()?;
    app.bootstrap(root);
    app.run();
    app.shutdown();

    Ok(())
}
