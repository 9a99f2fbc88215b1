#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for dry-run planning.
//!
//! Each scenario builds a throwaway project, expands its configuration and
//! plans goals against marker files on disk through [`FsProbe`], the same
//! path the `plan` command takes.

mod common;

use common::*;
use pybuild::plan::{FsProbe, plan};

fn plan_text(ctx: &IntegrationTestContext, goals: &[&str]) -> String {
    let rules = ctx.rules();
    plan(&rules, goals, &FsProbe::new(ctx.root_path()))
        .expect("plan")
        .to_string()
}

// ---------------------------------------------------------------------------
// Direct mode
// ---------------------------------------------------------------------------

#[test]
fn direct_lint_provisions_then_runs() {
    let ctx = TestContextBuilder::new().with_set("NO_DOCKER=1").build();
    insta::assert_snapshot!(plan_text(&ctx, &["lint"]), @r#"
    python3 -m venv build/venv/lint-no-docker
    build/venv/lint-no-docker/bin/pip -q --no-cache-dir --disable-pip-version-check install --progress-bar off --upgrade pip setuptools wheel
    build/venv/lint-no-docker/bin/pip --no-cache-dir --disable-pip-version-check install --progress-bar off -e . pylint=="3.2.7"
    touch build/venv/lint-no-docker.build
    build/venv/lint-no-docker/bin/python3 -m pylint -j 0 setup.py src
    "#);
}

#[test]
fn direct_test_with_marker_only_runs_tests() {
    let ctx = TestContextBuilder::new()
        .with_set("NO_DOCKER=1")
        .with_file("build/venv/test-no-docker.build")
        .build();
    insta::assert_snapshot!(plan_text(&ctx, &["test"]), @"build/venv/test-no-docker/bin/python3 -m unittest discover -t src/ -s src/tests/ -v");
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

#[test]
fn container_test_runs_every_runtime() {
    let ctx = TestContextBuilder::new()
        .with_project_file("[runtimes]\nimages = [\"python:3.9\", \"python:3.8\"]\n")
        .with_file("build/venv/test-python-3-9.build")
        .with_file("build/venv/test-python-3-8.build")
        .build();
    insta::assert_snapshot!(plan_text(&ctx, &["test"]), @r"
    docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.9 build/venv/test-python-3-9/bin/python3 -m unittest discover -t src/ -s src/tests/ -v
    docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.8 build/venv/test-python-3-8/bin/python3 -m unittest discover -t src/ -s src/tests/ -v
    ");
}

#[test]
fn missing_marker_pulls_image_first() {
    let ctx = TestContextBuilder::new().build();
    let text = plan_text(&ctx, &["changelog"]);
    let first = text.lines().next().unwrap();
    assert_eq!(
        first,
        "if [ \"$(docker images -q python:3)\" = \"\" ]; then docker pull -q python:3; fi"
    );
    assert!(text.ends_with("build/venv/changelog-python-3/bin/simple-git-changelog\n"));
}

#[test]
fn excluded_runtime_never_runs() {
    let ctx = TestContextBuilder::new()
        .with_set("PYTHON_IMAGES=a b c")
        .with_set("PYTHON_IMAGES_EXCLUDE=b")
        .with_file("build/venv/test-a.build")
        .with_file("build/venv/test-c.build")
        .build();
    let text = plan_text(&ctx, &["test"]);
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains("test-b"));
}

// ---------------------------------------------------------------------------
// Umbrellas
// ---------------------------------------------------------------------------

#[test]
fn commit_runs_test_lint_cover_in_order() {
    let ctx = TestContextBuilder::new()
        .with_set("NO_DOCKER=1")
        .with_file("build/venv/test-no-docker.build")
        .with_file("build/venv/lint-no-docker.build")
        .with_file("build/venv/cover-no-docker.build")
        .build();
    insta::assert_snapshot!(plan_text(&ctx, &["commit"]), @"
    build/venv/test-no-docker/bin/python3 -m unittest discover -t src/ -s src/tests/ -v
    build/venv/lint-no-docker/bin/python3 -m pylint -j 0 setup.py src
    build/venv/cover-no-docker/bin/python3 -m coverage run --source src/ --branch -m unittest discover -t src/ -s src/tests/ -v
    build/venv/cover-no-docker/bin/python3 -m coverage html -d build/coverage
    build/venv/cover-no-docker/bin/python3 -m coverage report --fail-under 100
    ");
}

fn direct_with_every_marker(builder: TestContextBuilder) -> IntegrationTestContext {
    ["test", "lint", "cover", "doc", "publish"]
        .into_iter()
        .fold(builder.with_set("NO_DOCKER=1"), |builder, category| {
            builder.with_file(&format!("build/venv/{category}-no-docker.build"))
        })
        .build()
}

#[test]
fn publish_cleans_and_commits_first() {
    let ctx = direct_with_every_marker(TestContextBuilder::new().with_set("SPHINX_DOC=doc"));
    insta::assert_snapshot!(plan_text(&ctx, &["publish"]), @"
    rm -rf build/ dist/ .coverage src/*.egg-info $(find src -name __pycache__)
    build/venv/test-no-docker/bin/python3 -m unittest discover -t src/ -s src/tests/ -v
    build/venv/lint-no-docker/bin/python3 -m pylint -j 0 setup.py src
    build/venv/cover-no-docker/bin/python3 -m coverage run --source src/ --branch -m unittest discover -t src/ -s src/tests/ -v
    build/venv/cover-no-docker/bin/python3 -m coverage html -d build/coverage
    build/venv/cover-no-docker/bin/python3 -m coverage report --fail-under 100
    build/venv/doc-no-docker/bin/sphinx-build -W -a -b doctest -d build/doc/doctrees/ doc build/doc/doctest/
    build/venv/doc-no-docker/bin/sphinx-build -W -a -b html -d build/doc/doctrees/ doc build/doc/html/
    build/venv/publish-no-docker/bin/python3 setup.py sdist
    build/venv/publish-no-docker/bin/twine check dist/*.tar.gz
    build/venv/publish-no-docker/bin/twine upload dist/*.tar.gz
    ");
}

#[test]
fn gh_pages_commits_then_syncs_checkout() {
    let ctx = direct_with_every_marker(
        TestContextBuilder::new()
            .with_set("SPHINX_DOC=doc")
            .with_set("GH_PAGES_DIR=../pages"),
    );
    insta::assert_snapshot!(plan_text(&ctx, &["gh-pages"]), @"
    rm -rf build/ dist/ .coverage src/*.egg-info $(find src -name __pycache__)
    build/venv/test-no-docker/bin/python3 -m unittest discover -t src/ -s src/tests/ -v
    build/venv/lint-no-docker/bin/python3 -m pylint -j 0 setup.py src
    build/venv/cover-no-docker/bin/python3 -m coverage run --source src/ --branch -m unittest discover -t src/ -s src/tests/ -v
    build/venv/cover-no-docker/bin/python3 -m coverage html -d build/coverage
    build/venv/cover-no-docker/bin/python3 -m coverage report --fail-under 100
    build/venv/doc-no-docker/bin/sphinx-build -W -a -b doctest -d build/doc/doctrees/ doc build/doc/doctest/
    build/venv/doc-no-docker/bin/sphinx-build -W -a -b html -d build/doc/doctrees/ doc build/doc/html/
    if [ ! -d ../pages ]; then git clone -b gh-pages `git config --get remote.origin.url` ../pages; fi
    cd ../pages && git pull
    rsync -rv --delete --exclude=.git/ build/doc/html/ ../pages
    touch ../pages/.nojekyll
    ");
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn overrides_reach_install_and_action_commands() {
    let ctx = TestContextBuilder::new()
        .with_set("NO_DOCKER=1")
        .with_set("PIP_ARGS=--bogus-pip-arg")
        .with_set("PIP_INSTALL_ARGS=--bogus-pip-install-arg")
        .with_set("PYLINT_VERSION=bogus-pylint-version")
        .with_set("PYLINT_ARGS=-j 2")
        .with_set("TESTS_REQUIRE=\"foobar >= 1.0\"")
        .build();
    insta::assert_snapshot!(plan_text(&ctx, &["lint"]), @r#"
    python3 -m venv build/venv/lint-no-docker
    build/venv/lint-no-docker/bin/pip -q --bogus-pip-arg install --bogus-pip-install-arg --upgrade pip setuptools wheel
    build/venv/lint-no-docker/bin/pip --bogus-pip-arg install --bogus-pip-install-arg -e . pylint=="bogus-pylint-version" "foobar >= 1.0"
    touch build/venv/lint-no-docker.build
    build/venv/lint-no-docker/bin/python3 -m pylint -j 2 setup.py src
    "#);
}

#[test]
fn project_file_requirements_stay_single_arguments() {
    let ctx = TestContextBuilder::new()
        .with_project_file(
            "[runtimes]\nimages = [\"python:3.9\"]\n[test]\nrequire = [\"foobar >= 1.0\", \"pyyaml\"]\n",
        )
        .build();
    insta::assert_snapshot!(plan_text(&ctx, &["test"]), @r#"
    if [ "$(docker images -q python:3.9)" = "" ]; then docker pull -q python:3.9; fi
    docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.9 python3 -m venv build/venv/test-python-3-9
    docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.9 build/venv/test-python-3-9/bin/pip -q --no-cache-dir --disable-pip-version-check install --progress-bar off --upgrade pip setuptools wheel
    docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.9 build/venv/test-python-3-9/bin/pip --no-cache-dir --disable-pip-version-check install --progress-bar off -e . "foobar >= 1.0" pyyaml
    touch build/venv/test-python-3-9.build
    docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd` python:3.9 build/venv/test-python-3-9/bin/python3 -m unittest discover -t src/ -s src/tests/ -v
    "#);
}

#[test]
fn doc_without_source_has_nothing_to_do() {
    let ctx = TestContextBuilder::new().build();
    insta::assert_snapshot!(plan_text(&ctx, &["doc", "gh-pages"]), @"
    nothing to be done for 'doc'
    nothing to be done for 'gh-pages'
    ");
}

#[test]
fn default_goal_is_help() {
    let ctx = TestContextBuilder::new().build();
    let rules = ctx.rules();
    let text = plan(&rules, &[rules.default_goal.as_str()], &FsProbe::new(ctx.root_path()))
        .unwrap()
        .to_string();
    insta::assert_snapshot!(text, @"echo 'usage: make [changelog|clean|commit|cover|doc|gh-pages|lint|publish|superclean|test]'");
}

#[test]
fn unknown_goal_fails() {
    let ctx = TestContextBuilder::new().build();
    let err = plan(&ctx.rules(), &["deploy"], &FsProbe::new(ctx.root_path())).unwrap_err();
    assert_eq!(err.to_string(), "no rule to make target 'deploy'");
}

#[test]
fn existing_project_file_is_a_valid_goal() {
    let ctx = TestContextBuilder::new().build();
    let text = plan_text(&ctx, &["setup.py"]);
    assert_eq!(text, "nothing to be done for 'setup.py'\n");
}
