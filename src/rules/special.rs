//! Fixed housekeeping targets.
use super::Target;
use crate::config::Category;
use crate::config::toolchain::{DocSettings, Toolchain};
use crate::config::variables::quote_word;

/// Name of the usage target and default goal.
pub const HELP: &str = "help";

/// Removes every build product.
#[must_use]
pub fn clean() -> Target {
    Target::utility(
        "clean",
        Vec::new(),
        vec!["rm -rf build/ dist/ .coverage src/*.egg-info $(find src -name __pycache__)".to_string()],
    )
}

/// [`clean`] plus removal of every runtime image.
#[must_use]
pub fn superclean(images: &[&str]) -> Target {
    let recipe = if images.is_empty() {
        Vec::new()
    } else {
        vec![format!("docker rmi -f {}", images.join(" "))]
    };
    Target::utility("superclean", vec!["clean".to_string()], recipe)
}

/// Pre-commit umbrella over the quality categories.
#[must_use]
pub fn commit() -> Target {
    Target::umbrella(
        "commit",
        Category::COMMIT
            .iter()
            .map(|category| category.name().to_string())
            .collect(),
    )
}

/// Publishes the HTML docs to the gh-pages checkout.
///
/// Without a doc source the target exists but does nothing.
#[must_use]
pub fn gh_pages(doc: &Toolchain<DocSettings>) -> Target {
    if !doc.is_active() {
        return Target::utility("gh-pages", Vec::new(), Vec::new());
    }
    let dir = quote_word(&doc.settings.gh_pages_dir);
    Target::utility(
        "gh-pages",
        vec!["clean".to_string(), "commit".to_string()],
        vec![
            format!(
                "if [ ! -d {dir} ]; then git clone -b gh-pages `git config --get remote.origin.url` {dir}; fi"
            ),
            format!("cd {dir} && git pull"),
            format!("rsync -rv --delete --exclude=.git/ build/doc/html/ {dir}"),
            format!("touch {dir}/.nojekyll"),
        ],
    )
}

/// Usage line listing `entry_points`.
#[must_use]
pub fn help<S: AsRef<str>>(entry_points: &[S]) -> Target {
    let names: Vec<&str> = entry_points.iter().map(AsRef::as_ref).collect();
    Target::utility(
        HELP,
        Vec::new(),
        vec![format!("echo 'usage: make [{}]'", names.join("|"))],
    )
}
