//! Category action commands.
use super::template::RuleTemplate;
use crate::config::{Category, ResolvedConfig};

const TEST_DIRS: &str = "-t src/ -s src/tests/";
const COVERAGE_HTML: &str = "build/coverage";
const DOC_TREES: &str = "build/doc/doctrees/";

/// How the test and cover actions select tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TestMode<'a> {
    /// Explicit unittest selection.
    Filter(&'a str),
    /// unittest-parallel discovery.
    Parallel,
    /// unittest discovery.
    Discover,
}

impl<'a> TestMode<'a> {
    fn of(config: &'a ResolvedConfig) -> Self {
        if let Some(filter) = config.test.filter.as_deref() {
            Self::Filter(filter)
        } else if config.toolchains.parallel.is_active() {
            Self::Parallel
        } else {
            Self::Discover
        }
    }
}

/// Action recipe for `template`'s category.
#[must_use]
pub fn actions(template: &RuleTemplate<'_>, config: &ResolvedConfig) -> Vec<String> {
    match template.category {
        Category::Test => test(template, config),
        Category::Cover => cover(template, config),
        Category::Lint => vec![
            template
                .tool("python3")
                .arg("-m pylint")
                .arg(&config.toolchains.lint.settings.args)
                .arg("setup.py src")
                .build(),
        ],
        Category::Doc => doc(template, config),
        Category::Publish => vec![
            template.tool("python3").arg("setup.py sdist").build(),
            template.tool("twine").arg("check dist/*.tar.gz").build(),
            template.tool("twine").arg("upload dist/*.tar.gz").build(),
        ],
        Category::Changelog => vec![template.tool("simple-git-changelog").build()],
    }
}

fn test(template: &RuleTemplate<'_>, config: &ResolvedConfig) -> Vec<String> {
    let args = &config.test.args;
    let line = match TestMode::of(config) {
        TestMode::Filter(filter) => template
            .tool("python3")
            .arg("-m unittest")
            .arg(args)
            .arg(filter),
        TestMode::Parallel => template
            .tool("unittest-parallel")
            .arg(TEST_DIRS)
            .arg(&config.toolchains.parallel.settings.args),
        TestMode::Discover => template
            .tool("python3")
            .arg("-m unittest discover")
            .arg(TEST_DIRS)
            .arg(args),
    };
    vec![line.build()]
}

fn cover(template: &RuleTemplate<'_>, config: &ResolvedConfig) -> Vec<String> {
    let cover = &config.toolchains.cover.settings;
    let run = template
        .tool("python3")
        .arg("-m coverage run --source src/")
        .arg(&cover.args);
    let run = match TestMode::of(config) {
        TestMode::Parallel => {
            let parallel = &config.toolchains.parallel.settings;
            return vec![
                template
                    .tool("unittest-parallel")
                    .arg(TEST_DIRS)
                    .arg(&parallel.args)
                    .arg(format!("--coverage-html={COVERAGE_HTML}"))
                    .arg(&parallel.coverage_args)
                    .build(),
            ];
        }
        TestMode::Filter(filter) => run.arg("-m unittest").arg(&config.test.args).arg(filter),
        TestMode::Discover => run
            .arg("-m unittest discover")
            .arg(TEST_DIRS)
            .arg(&config.test.args),
    };
    vec![
        run.build(),
        template
            .tool("python3")
            .arg(format!("-m coverage html -d {COVERAGE_HTML}"))
            .build(),
        template
            .tool("python3")
            .arg("-m coverage report")
            .arg(&cover.report_args)
            .build(),
    ]
}

fn doc(template: &RuleTemplate<'_>, config: &ResolvedConfig) -> Vec<String> {
    let doc = &config.toolchains.doc.settings;
    ["doctest", "html"]
        .into_iter()
        .map(|builder| {
            template
                .tool("sphinx-build")
                .arg(&doc.args)
                .arg(format!("-b {builder} -d {DOC_TREES}"))
                .arg(&doc.source)
                .arg(format!("build/doc/{builder}/"))
                .build()
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{RuntimeSpec, Variables, resolve};

    fn config(assignments: &[&str]) -> ResolvedConfig {
        let mut vars = Variables::defaults();
        vars.apply_assignments(assignments).unwrap();
        resolve(&vars, "demo").unwrap()
    }

    fn host_actions(category: Category, assignments: &[&str]) -> Vec<String> {
        let cfg = config(assignments);
        let runtime = RuntimeSpec::host();
        actions(&RuleTemplate::new(category, &runtime), &cfg)
    }

    // -----------------------------------------------------------------------
    // test
    // -----------------------------------------------------------------------

    #[test]
    fn test_discover() {
        assert_eq!(
            host_actions(Category::Test, &[]),
            vec!["build/venv/test-no-docker/bin/python3 -m unittest discover -t src/ -s src/tests/ -v"]
        );
    }

    #[test]
    fn test_filter_wins_over_parallel() {
        assert_eq!(
            host_actions(Category::Test, &["TEST=tests.test_package", "UNITTEST_PARALLEL=1"]),
            vec!["build/venv/test-no-docker/bin/python3 -m unittest -v tests.test_package"]
        );
    }

    #[test]
    fn test_parallel() {
        assert_eq!(
            host_actions(Category::Test, &["UNITTEST_PARALLEL=1"]),
            vec!["build/venv/test-no-docker/bin/unittest-parallel -t src/ -s src/tests/ -v"]
        );
    }

    #[test]
    fn test_empty_args_leave_no_double_space() {
        assert_eq!(
            host_actions(Category::Test, &["UNITTEST_ARGS="]),
            vec!["build/venv/test-no-docker/bin/python3 -m unittest discover -t src/ -s src/tests/"]
        );
    }

    // -----------------------------------------------------------------------
    // cover
    // -----------------------------------------------------------------------

    #[test]
    fn cover_discover_runs_three_commands() {
        let env = "build/venv/cover-no-docker/bin";
        assert_eq!(
            host_actions(Category::Cover, &[]),
            vec![
                format!("{env}/python3 -m coverage run --source src/ --branch -m unittest discover -t src/ -s src/tests/ -v"),
                format!("{env}/python3 -m coverage html -d build/coverage"),
                format!("{env}/python3 -m coverage report --fail-under 100"),
            ]
        );
    }

    #[test]
    fn cover_with_filter() {
        let actions = host_actions(Category::Cover, &["TEST=tests.test_package"]);
        assert_eq!(
            actions[0],
            "build/venv/cover-no-docker/bin/python3 -m coverage run --source src/ --branch -m unittest -v tests.test_package"
        );
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn cover_parallel_is_single_command() {
        assert_eq!(
            host_actions(Category::Cover, &["UNITTEST_PARALLEL=1"]),
            vec!["build/venv/cover-no-docker/bin/unittest-parallel -t src/ -s src/tests/ -v --coverage-html=build/coverage --coverage-branch --coverage-fail-under 100"]
        );
    }

    // -----------------------------------------------------------------------
    // lint / doc / publish / changelog
    // -----------------------------------------------------------------------

    #[test]
    fn lint_uses_pylint_args() {
        assert_eq!(
            host_actions(Category::Lint, &["PYLINT_ARGS=--disable=C"]),
            vec!["build/venv/lint-no-docker/bin/python3 -m pylint --disable=C setup.py src"]
        );
    }

    #[test]
    fn doc_builds_doctest_then_html() {
        let env = "build/venv/doc-no-docker/bin";
        assert_eq!(
            host_actions(Category::Doc, &["SPHINX_DOC=doc"]),
            vec![
                format!("{env}/sphinx-build -W -a -b doctest -d build/doc/doctrees/ doc build/doc/doctest/"),
                format!("{env}/sphinx-build -W -a -b html -d build/doc/doctrees/ doc build/doc/html/"),
            ]
        );
    }

    #[test]
    fn publish_packages_checks_and_uploads() {
        let env = "build/venv/publish-no-docker/bin";
        assert_eq!(
            host_actions(Category::Publish, &[]),
            vec![
                format!("{env}/python3 setup.py sdist"),
                format!("{env}/twine check dist/*.tar.gz"),
                format!("{env}/twine upload dist/*.tar.gz"),
            ]
        );
    }

    #[test]
    fn changelog_runs_tool() {
        assert_eq!(
            host_actions(Category::Changelog, &[]),
            vec!["build/venv/changelog-no-docker/bin/simple-git-changelog"]
        );
    }

    #[test]
    fn container_actions_carry_wrapper() {
        let cfg = config(&[]);
        let runtime = RuntimeSpec::from_image("python:3.9").unwrap();
        let lines = actions(&RuleTemplate::new(Category::Lint, &runtime), &cfg);
        assert_eq!(
            lines[0],
            "docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.9 build/venv/lint-python-3-9/bin/python3 -m pylint -j 0 setup.py src"
        );
    }
}
