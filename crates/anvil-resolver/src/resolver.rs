//! Planning operations: `install`, `uninstall`, `upgrade`, `downgrade`.
//!
//! All four are pure functions of a configuration plus the available and
//! installed Sets. None perform I/O or mutate disk; the caller (the
//! executor) is responsible for materializing the returned [`Plan`].

use crate::provider::Chooser;
use crate::types::{Plan, Traversal};
use anvil_config::Configuration;
use anvil_core::unit::{FLAG_INSTALLED_AS_DEPENDENCY, FLAG_INSTALLED_BY_USER};
use anvil_core::{relationship, version, Error, Package, Result, Set, Unit};

fn identity_of(package: &Package) -> String {
    format!("{}:{} {}", package.name, package.architecture, package.version)
}

/// The set of strings a reverse-dependency scan matches against: the
/// package's own target plus every virtual name it provides.
fn package_targets(pkg: &Package) -> Vec<String> {
    let mut targets = vec![pkg.as_target()];
    targets.extend(pkg.provides().iter().cloned());
    targets
}

struct InstallPlanner<'a> {
    config: &'a Configuration,
    installed: &'a Set,
    available: &'a Set,
    chooser: &'a dyn Chooser,
    traversal: Traversal,
    to_install: Set,
    notes: Vec<String>,
}

impl<'a> InstallPlanner<'a> {
    fn new(config: &'a Configuration, installed: &'a Set, available: &'a Set, chooser: &'a dyn Chooser) -> Self {
        Self {
            config,
            installed,
            available,
            chooser,
            traversal: Traversal::new(),
            to_install: Set::new(),
            notes: Vec::new(),
        }
    }

    fn attempt(&mut self, unit: Unit, user_named: bool) -> Result<()> {
        match unit {
            Unit::Group(group) => {
                for key in group.members.clone() {
                    let identity = format!("{}:{} {}", key.name, key.arch, key.version);
                    if let Some(member) = self.available.get_named(&identity).cloned() {
                        self.attempt(member, user_named)?;
                    }
                }
                Ok(())
            }
            Unit::Virtual(v) => {
                if v.providers.is_empty() {
                    return Err(Error::broken_dependency(v.name.clone(), v.name.clone()));
                }
                let index = if v.providers.len() == 1 { 0 } else { self.chooser.choose(&v.name, &v.providers) };
                let key = &v.providers[index];
                let identity = format!("{}:{} {}", key.name, key.arch, key.version);
                let package = self
                    .available
                    .get_named(&identity)
                    .and_then(Unit::as_package)
                    .cloned()
                    .ok_or_else(|| Error::broken_dependency(v.name.clone(), v.name.clone()))?;
                self.attempt(Unit::Package(package), user_named)
            }
            Unit::Package(package) => self.target_package(package, user_named),
        }
    }

    fn target_package(&mut self, mut package: Package, user_named: bool) -> Result<()> {
        if self.installed.contains_package(&package.name, &package.version, &package.architecture) {
            self.notes.push(format!("{package} is already installed"));
            return Ok(());
        }

        let identity = identity_of(&package);
        if self.traversal.contains(&identity) {
            return Ok(());
        }
        let node = self.traversal.mark(&identity);

        if user_named {
            package.add_temporary_flag(FLAG_INSTALLED_BY_USER);
        } else {
            package.add_temporary_flag(FLAG_INSTALLED_AS_DEPENDENCY);
        }

        for dep in package.depends().to_vec() {
            let rel = relationship::parse(&dep).ok_or_else(|| Error::broken_dependency(package.to_string(), dep.clone()))?;
            if self.installed.target(&rel).is_some() {
                continue;
            }
            let dep_unit = self
                .available
                .target(&rel)
                .cloned()
                .ok_or_else(|| Error::broken_dependency(package.to_string(), dep.clone()))?;
            let dep_identity = dep_unit.display_identity();
            if !self.traversal.contains(&dep_identity) {
                self.attempt(dep_unit, false)?;
            }
            if let Some(dep_node) = self.traversal.node_of(&dep_identity) {
                self.traversal.add_edge(node, dep_node);
            }
        }

        tracing::debug!(package = %package, user_named, "targeted for install");
        self.to_install.insert(package);
        Ok(())
    }

    fn finish(mut self) -> Result<Plan> {
        for package in self.to_install.packages() {
            if !self.config.is_unit_allowed(&Unit::Package(package.clone())) {
                return Err(Error::package_not_allowed(package.to_string()));
            }
        }

        let snapshot: Vec<Package> = self.to_install.packages().cloned().collect();
        for package in &snapshot {
            for conflict in package.conflicts() {
                let Some(rel) = relationship::parse(conflict) else { continue };
                if let Some(other) = self.installed.target(&rel).and_then(Unit::as_package) {
                    return Err(Error::conflict(package.to_string(), other.to_string()));
                }
                if let Some(other) = self.to_install.packages().find(|p| p.key() != package.key() && relationship_matches(&rel, p)) {
                    return Err(Error::conflict(package.to_string(), other.to_string()));
                }
            }
        }

        let committed: Vec<Package> = snapshot
            .into_iter()
            .map(|mut package| {
                package.commit();
                package
            })
            .collect();
        let mut to_install = Set::new();
        for package in committed {
            to_install.insert(package);
        }

        Ok(Plan { to_install, to_uninstall: Set::new(), notes: self.notes })
    }
}

fn relationship_matches(rel: &relationship::Relationship, package: &Package) -> bool {
    if rel.name != package.name {
        return false;
    }
    if let Some(arch) = &rel.arch {
        if arch != &package.architecture {
            return false;
        }
    }
    match &rel.constraint {
        None => true,
        Some((op, v)) => {
            let cmp = version::compare(&package.version, v);
            match op {
                relationship::Op::Lt => cmp < 0,
                relationship::Op::Le => cmp <= 0,
                relationship::Op::Eq => cmp == 0,
                relationship::Op::Ge => cmp >= 0,
                relationship::Op::Gt => cmp > 0,
            }
        }
    }
}

/// Plan the installation of `attempt` (units resolved against `available`
/// by the caller, typically from user-supplied target strings).
pub fn install(config: &Configuration, installed: &Set, available: &Set, attempt: Vec<Unit>, chooser: &dyn Chooser) -> Result<Plan> {
    let mut planner = InstallPlanner::new(config, installed, available, chooser);
    for unit in attempt {
        planner.attempt(unit, true)?;
    }
    planner.finish()
}

struct UninstallPlanner<'a> {
    installed: &'a Set,
    traversal: Traversal,
    to_uninstall: Set,
    notes: Vec<String>,
}

impl<'a> UninstallPlanner<'a> {
    fn new(installed: &'a Set) -> Self {
        Self { installed, traversal: Traversal::new(), to_uninstall: Set::new(), notes: Vec::new() }
    }

    fn attempt(&mut self, unit: Unit) -> Result<()> {
        match unit {
            Unit::Group(group) => {
                for key in group.members.clone() {
                    let identity = format!("{}:{} {}", key.name, key.arch, key.version);
                    if let Some(member) = self.installed.get_named(&identity).cloned() {
                        self.attempt(member)?;
                    }
                }
                Ok(())
            }
            Unit::Virtual(v) => {
                for key in v.providers.clone() {
                    let identity = format!("{}:{} {}", key.name, key.arch, key.version);
                    if let Some(provider) = self.installed.get_named(&identity).cloned() {
                        self.attempt(provider)?;
                    }
                }
                Ok(())
            }
            Unit::Package(package) => self.target_package(package),
        }
    }

    fn target_package(&mut self, package: Package) -> Result<()> {
        if !self.installed.contains_package(&package.name, &package.version, &package.architecture) {
            self.notes.push(format!("{package} is not installed"));
            return Ok(());
        }

        let identity = identity_of(&package);
        if self.traversal.contains(&identity) {
            return Ok(());
        }
        self.traversal.mark(&identity);

        let targets = package_targets(&package);
        let blocked = self.installed.packages().any(|p| {
            if p.key() == package.key() {
                return false;
            }
            if self.to_uninstall.contains_package(&p.name, &p.version, &p.architecture) {
                return false;
            }
            p.depends().iter().any(|d| targets.iter().any(|t| t == d))
        });

        if blocked {
            self.traversal.unmark(&identity);
            self.notes.push(format!("{package} is required by another installed package; keeping"));
            return Ok(());
        }

        tracing::debug!(package = %package, "targeted for uninstall");
        self.to_uninstall.insert(package.clone());

        for dep in package.depends().to_vec() {
            let Some(rel) = relationship::parse(&dep) else { continue };
            if let Some(dep_unit) = self.installed.target(&rel).cloned() {
                self.attempt(dep_unit)?;
            }
        }
        Ok(())
    }
}

/// Plan the uninstallation of `attempt` (units resolved against
/// `installed` by the caller).
pub fn uninstall(installed: &Set, attempt: Vec<Unit>) -> Result<Plan> {
    let mut planner = UninstallPlanner::new(installed);
    for unit in attempt {
        planner.attempt(unit)?;
    }
    Ok(Plan { to_install: Set::new(), to_uninstall: planner.to_uninstall, notes: planner.notes })
}

fn substitute_for(package: &Package, available: &Set, want_greater: bool) -> Option<Package> {
    if let Some(replacement) = available
        .packages()
        .find(|candidate| candidate.replaces().iter().any(|r| r == &package.name || r == &package.as_target()))
    {
        return Some(replacement.clone());
    }

    available
        .packages()
        .filter(|candidate| candidate.name == package.name && candidate.architecture == package.architecture)
        .filter(|candidate| {
            let cmp = version::compare(&candidate.version, &package.version);
            if want_greater {
                cmp > 0
            } else {
                cmp < 0
            }
        })
        .max_by(|a, b| version::compare(&a.version, &b.version).cmp(&0))
        .cloned()
}

struct SubstitutePlanner<'a> {
    installed: &'a Set,
    available: &'a Set,
    want_greater: bool,
    traversal: Traversal,
    to_install: Set,
    to_uninstall: Set,
    notes: Vec<String>,
}

impl<'a> SubstitutePlanner<'a> {
    fn new(installed: &'a Set, available: &'a Set, want_greater: bool) -> Self {
        Self {
            installed,
            available,
            want_greater,
            traversal: Traversal::new(),
            to_install: Set::new(),
            to_uninstall: Set::new(),
            notes: Vec::new(),
        }
    }

    fn attempt(&mut self, package: Package) -> Result<()> {
        let identity = identity_of(&package);
        if self.traversal.contains(&identity) {
            return Ok(());
        }
        self.traversal.mark(&identity);

        let Some(mut substitute) = substitute_for(&package, self.available, self.want_greater) else {
            self.notes.push(format!("no {} candidate for {package}", if self.want_greater { "upgrade" } else { "downgrade" }));
            return Ok(());
        };

        substitute.set_persistent_flags(package.persistent_flags().clone());
        self.to_uninstall.insert(package);
        let substitute_deps = substitute.clone();
        self.to_install.insert(substitute);

        for dep in substitute_deps.depends().to_vec() {
            let rel =
                relationship::parse(&dep).ok_or_else(|| Error::broken_dependency(substitute_deps.to_string(), dep.clone()))?;
            if let Some(installed_dep) = self.installed.target(&rel).and_then(Unit::as_package).cloned() {
                self.attempt(installed_dep)?;
            } else {
                let dep_unit = self
                    .available
                    .target(&rel)
                    .cloned()
                    .ok_or_else(|| Error::broken_dependency(substitute_deps.to_string(), dep.clone()))?;
                self.install_missing(dep_unit);
            }
        }
        Ok(())
    }

    fn install_missing(&mut self, unit: Unit) {
        let Unit::Package(mut package) = unit else { return };
        if self.installed.contains_package(&package.name, &package.version, &package.architecture) {
            return;
        }
        let identity = identity_of(&package);
        if self.traversal.contains(&identity) {
            return;
        }
        self.traversal.mark(&identity);
        package.add_temporary_flag(FLAG_INSTALLED_AS_DEPENDENCY);
        self.to_install.insert(package);
    }
}

/// Plan an upgrade of `attempt` (installed units named by the user).
pub fn upgrade(installed: &Set, available: &Set, attempt: Vec<Package>) -> Result<Plan> {
    let mut planner = SubstitutePlanner::new(installed, available, true);
    for package in attempt {
        planner.attempt(package)?;
    }
    Ok(Plan { to_install: planner.to_install, to_uninstall: planner.to_uninstall, notes: planner.notes })
}

/// Plan a downgrade of `attempt` (installed units named by the user).
pub fn downgrade(installed: &Set, available: &Set, attempt: Vec<Package>) -> Result<Plan> {
    let mut planner = SubstitutePlanner::new(installed, available, false);
    for package in attempt {
        planner.attempt(package)?;
    }
    Ok(Plan { to_install: planner.to_install, to_uninstall: planner.to_uninstall, notes: planner.notes })
}
