//! Expansion of a resolved configuration into a [`RuleSet`].
use super::actions::actions;
use super::packages::packages;
use super::special;
use super::template::RuleTemplate;
use super::{GeneratedRule, RuleSet, Target};
use crate::config::{Category, ResolvedConfig};

/// Expand `config` into every rule the Makefile declares.
///
/// Disabled categories still get an (empty) umbrella so that `make <category>`
/// always resolves.
#[must_use]
pub fn expand(config: &ResolvedConfig) -> RuleSet {
    let generated: Vec<GeneratedRule> = Category::ALL
        .into_iter()
        .filter(|category| config.toolchains.is_active(*category))
        .flat_map(|category| expand_category(category, config))
        .collect();

    let meta_targets = Category::ALL
        .into_iter()
        .map(|category| {
            let mut prerequisites = Vec::new();
            if category == Category::Publish {
                prerequisites.extend(["clean".to_string(), "commit".to_string()]);
            }
            prerequisites.extend(
                generated
                    .iter()
                    .filter(|rule| rule.category == category)
                    .map(|rule| rule.name().to_string()),
            );
            Target::umbrella(category.name(), prerequisites)
        })
        .collect();

    let utilities = vec![
        special::clean(),
        special::superclean(&config.images()),
        special::commit(),
        special::gh_pages(&config.toolchains.doc),
    ];

    let mut set = RuleSet {
        default_goal: special::HELP.to_string(),
        help: special::help::<&str>(&[]),
        generated,
        meta_targets,
        utilities,
    };
    let names: Vec<String> = set
        .entry_points()
        .iter()
        .map(|target| target.name.clone())
        .collect();
    set.help = special::help(&names);
    set
}

fn expand_category(category: Category, config: &ResolvedConfig) -> Vec<GeneratedRule> {
    let packages = packages(category, config);
    category
        .binding(config.toolchains.cover.settings.all_runtimes)
        .select(&config.runtimes)
        .iter()
        .map(|runtime| {
            let template = RuleTemplate::new(category, runtime);
            let actions = actions(&template, config);
            template.instantiate(&config.pip, &packages, actions)
        })
        .collect()
}
