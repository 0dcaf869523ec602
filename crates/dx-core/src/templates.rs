//! Boilerplate written into freshly scaffolded projects.

use crate::error::Result;
use crate::io;
use crate::paths::{FORCEIGNORE_FILE, GITIGNORE_FILE, README_FILE};
use std::path::Path;

pub fn render_readme(project_name: &str, package_dir: &str, description: &str) -> String {
    let description = match description.trim() {
        "" => "_No description yet._",
        text => text,
    };
    format!(
        "# {project_name}\n\n\
        {description}\n\n\
        ## Layout\n\n\
        Source lives in `{package_dir}/`. The scratch org definition is in \
        `config/scratch-org-def.json`; `manifest/package.xml` lists the metadata \
        types to retrieve.\n\n\
        ## Getting started\n\n\
        ```sh\n\
        sfdx force:org:create -f config/scratch-org-def.json -a {project_name} -s\n\
        sfdx force:source:push\n\
        sfdx force:org:open\n\
        ```\n"
    )
}

pub const GITIGNORE: &str = r#"# sfdx local state
.sfdx/
.sf/
.localdevserver/
sfdx_logs/

# editors
.vscode/
.idea/
*.swp

# dependencies and logs
node_modules/
npm-debug.log*
*.log

# OS
.DS_Store
Thumbs.db
"#;

pub const FORCEIGNORE: &str = r#"# Files excluded from source push and pull
package.xml

# LWC configuration
**/jsconfig.json
**/.eslintrc.json

# LWC Jest
**/__tests__/**

**/profiles/**
"#;

/// Write the project boilerplate: the README (only if `readme` is given)
/// and both ignore files, always.
pub fn write_project_files(project: &Path, readme: Option<&str>) -> Result<()> {
    if let Some(text) = readme {
        io::atomic_write(&project.join(README_FILE), text.as_bytes())?;
    }
    io::atomic_write(&project.join(FORCEIGNORE_FILE), FORCEIGNORE.as_bytes())?;
    io::atomic_write(&project.join(GITIGNORE_FILE), GITIGNORE.as_bytes())?;
    Ok(())
}
