//! Implements each subcommand: load repos and PUTs into a
//! [`DependencyAnalyzer`], run the requested check(s), report diagnostics.

use rpmdeplint_cache::{CacheConfig, RepoCache};
use rpmdeplint_repo::RepoLoader;
use rpmdeplint_solve::{DependencyAnalyzer, SolverPoolBuilder};
use rpmdeplint_types::Repo;

use crate::arch::determine_test_arch;
use crate::cli::CommonArgs;
use crate::error::Error;

/// Whether a subcommand found any defect, independent of the particular
/// check(s) that ran. `main` maps `false` to exit 3.
pub type CheckOutcome = bool;

/// Builds a [`DependencyAnalyzer`] from `args`: reads every PUT, resolves
/// `--repo`/`--repos-from-system` into [`Repo`]s, determines the test
/// architecture, then loads and interns everything into a solver pool.
fn prepare(args: &CommonArgs) -> Result<DependencyAnalyzer, Error> {
    // Parsed before any file is touched: malformed `--repo` syntax is a pure
    // usage error and shouldn't depend on whether the PUTs happen to exist.
    let mut repos: Vec<Repo> = args
        .repos
        .iter()
        .map(|spec| parse_repo_arg(spec))
        .collect::<Result<_, _>>()?;
    if args.repos_from_system {
        repos.extend(rpmdeplint_repo::load_system_repos()?);
    }

    let puts: Vec<_> = args
        .rpmpaths
        .iter()
        .map(|path| rpmdeplint_rpm::read_put(path))
        .collect::<Result<_, _>>()?;

    let arch = determine_test_arch(&puts, args.arch.clone())?;

    let cache = RepoCache::new(CacheConfig::from_env()?);
    cache.sweep()?;
    let loader = RepoLoader::new();

    let mut builder = SolverPoolBuilder::new(arch);
    for repo in &repos {
        builder.add_repo_packages(loader.load(repo, &cache)?);
    }
    builder.add_puts(puts);

    Ok(DependencyAnalyzer::new(builder.finalize(), repos, loader, cache))
}

/// Parses one `--repo NAME,REPOURL_OR_PATH` value.
fn parse_repo_arg(spec: &str) -> Result<Repo, Error> {
    let (name, location) = spec.split_once(',').ok_or_else(|| {
        Error::Usage(format!(
            "invalid --repo value {spec:?}: expected NAME,REPOURL_OR_PATH"
        ))
    })?;
    if name.is_empty() {
        return Err(Error::Usage(format!(
            "invalid --repo value {spec:?}: repo name must not be empty"
        )));
    }
    Ok(Repo::from_base_url(name, location))
}

/// Prints a diagnostic category block to stderr if `problems` is non-empty,
/// per §6's stable text contract, and reports whether it printed anything.
fn report_block<'a>(header: &str, problems: impl IntoIterator<Item = &'a rpmdeplint_types::Problem>) -> bool {
    let mut iter = problems.into_iter().peekable();
    if iter.peek().is_none() {
        return false;
    }
    eprintln!("{header}");
    for problem in iter {
        eprintln!("{problem}");
    }
    true
}

/// `check`: runs all four checks, in the spec's fixed order, and aggregates.
pub fn check(args: &CommonArgs) -> Result<CheckOutcome, Error> {
    let mut analyzer = prepare(args)?;

    let (ok, set) = analyzer.try_to_install_all()?;
    let sat_found = !ok && report_block("Problems with dependency set:", set.overall_problems());

    let repoclosure = analyzer.find_repoclosure_problems()?;
    let repoclosure_found = report_block("Dependency problems with repos:", repoclosure.iter());

    let conflicts = analyzer.find_conflicts()?;
    let conflicts_found = report_block("Undeclared file conflicts:", conflicts.iter());

    let upgrade = analyzer.find_upgrade_problems()?;
    let upgrade_found = report_block("Upgrade problems:", upgrade.iter());

    Ok(sat_found || repoclosure_found || conflicts_found || upgrade_found)
}

/// `check-sat`: only §4.4.1.
pub fn check_sat(args: &CommonArgs) -> Result<CheckOutcome, Error> {
    let mut analyzer = prepare(args)?;
    let (ok, set) = analyzer.try_to_install_all()?;
    if !ok {
        report_block("Problems with dependency set:", set.overall_problems());
    }
    Ok(!ok)
}

/// `check-repoclosure`: only §4.4.2.
pub fn check_repoclosure(args: &CommonArgs) -> Result<CheckOutcome, Error> {
    let mut analyzer = prepare(args)?;
    let problems = analyzer.find_repoclosure_problems()?;
    Ok(report_block("Dependency problems with repos:", problems.iter()))
}

/// `check-conflicts`: only §4.4.3.
pub fn check_conflicts(args: &CommonArgs) -> Result<CheckOutcome, Error> {
    let mut analyzer = prepare(args)?;
    let problems = analyzer.find_conflicts()?;
    Ok(report_block("Undeclared file conflicts:", problems.iter()))
}

/// `check-upgrade`: only §4.4.4.
pub fn check_upgrade(args: &CommonArgs) -> Result<CheckOutcome, Error> {
    let mut analyzer = prepare(args)?;
    let problems = analyzer.find_upgrade_problems()?;
    Ok(report_block("Upgrade problems:", problems.iter()))
}

/// `list-deps`: runs §4.4.1; on success, prints each PUT's transitive
/// dependency closure to stdout in the `"<nevra> has <n> dependencies:\n\t<dep>\n..."`
/// format.
pub fn list_deps(args: &CommonArgs) -> Result<CheckOutcome, Error> {
    let mut analyzer = prepare(args)?;
    let (ok, set) = analyzer.try_to_install_all()?;
    if !ok {
        report_block("Problems with dependency set:", set.overall_problems());
        return Ok(true);
    }

    for nevra in set.packages() {
        let result = set.get(nevra).expect("packages() only yields recorded keys");
        println!("{nevra} has {} dependencies:", result.dependencies.len());
        for dep in &result.dependencies {
            println!("\t{dep}");
        }
        println!();
    }

    Ok(false)
}
