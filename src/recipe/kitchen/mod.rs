// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are evaluated
//!
//! One evaluation takes a recipe, raw options and settings through:
//! - option normalization and requirement resolution
//! - generation of the build tool's configuration
//! - configure, build and test via the external tool
//! - package assembly and consumer info publication
//!
//! Each evaluation is independent. Nothing is shared between runs except
//! the reusable build directory.

mod config;
pub mod orchestrator;
pub mod packager;
pub mod tool;

pub use config::{Evaluation, KitchenConfig, Plan};
pub use orchestrator::{BuildReport, BuildState, CancellationToken, Orchestrator};
pub use packager::{discard_previous, PackageLayout, Packager};
pub use tool::{BuildTool, CMakeTool, StepOutput, ToolContext};

use crate::config::AmbientConfig;
use crate::error::Result;
use crate::recipe::consumer::publish;
use crate::recipe::format::Recipe;
use crate::recipe::generator::emit;
use crate::recipe::options::{normalize, RawOptions};
use crate::recipe::requirements::resolve;
use crate::recipe::settings::Settings;
use std::sync::Arc;
use tracing::info;

/// Compute everything that does not need the build tool
///
/// Invalid options fail here, before any file is written or any external
/// step runs.
pub fn plan(
    recipe: &Recipe,
    raw: &RawOptions,
    settings: &Settings,
    ambient: &AmbientConfig,
) -> Result<Plan> {
    let options = normalize(&recipe.options, raw, settings)?;
    let requirements = resolve(&recipe.requires, &options, settings);
    let generated = emit(recipe, &options, settings, &requirements, ambient);
    let consumer = publish(recipe, &options, settings);

    Ok(Plan {
        settings: settings.clone(),
        options,
        requirements,
        generated,
        consumer,
    })
}

/// The Kitchen: evaluates recipes with one build tool
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    tool: Arc<dyn BuildTool>,
    cancel: Option<CancellationToken>,
}

impl Kitchen {
    pub fn new(config: KitchenConfig, tool: Arc<dyn BuildTool>) -> Self {
        Self {
            config,
            tool,
            cancel: None,
        }
    }

    /// Observe `token` between build steps
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Plan and write the generated files into the build dir
    pub fn generate(&self, recipe: &Recipe, raw: &RawOptions, settings: &Settings) -> Result<Plan> {
        let plan = plan(recipe, raw, settings, &self.config.ambient)?;
        plan.generated.write(&self.config.generators_dir())?;
        Ok(plan)
    }

    fn tool_context(&self, recipe: &Recipe, settings: &Settings) -> ToolContext {
        let ambient = &self.config.ambient;
        // Examples and tests are separate targets
        let target = if ambient.build_examples() || ambient.run_tests() {
            None
        } else {
            recipe.package.build_target.clone()
        };

        ToolContext {
            source_dir: self.config.source_dir.clone(),
            build_dir: self.config.build_dir.clone(),
            toolchain_file: self.config.toolchain_file(),
            build_type: settings.build_type,
            target,
            jobs: ambient.jobs,
        }
    }

    /// Run a full evaluation
    ///
    /// A package left by an earlier run is discarded once the plan is valid.
    /// The packager only runs once the orchestrator reached `Done`. Consumer
    /// info is written into the package root next to the packaged files.
    pub fn evaluate(
        &self,
        recipe: &Recipe,
        raw: &RawOptions,
        settings: &Settings,
    ) -> Result<Evaluation> {
        info!(
            "Evaluating {} version {} ({})",
            recipe.package.name, recipe.package.version, settings
        );

        let plan = self.generate(recipe, raw, settings)?;
        discard_previous(&self.config.package_dir)?;
        let ctx = self.tool_context(recipe, settings);
        let ambient = &self.config.ambient;

        let mut orchestrator = Orchestrator::new(self.tool.as_ref())
            .run_tests(ambient.run_tests())
            .test_policy(ambient.test_policy);
        if let Some(token) = &self.cancel {
            orchestrator = orchestrator.cancellation(token.clone());
        }
        let report = orchestrator.run(&ctx)?;

        let layout = Packager::new(self.tool.as_ref(), &recipe.packaging)
            .include_examples(ambient.build_examples())
            .consumer_info(&plan.consumer)
            .package(&self.config.package_dir, &ctx)?;

        info!(
            "Packaged {} with {} requirement(s) into {}",
            recipe.package.name,
            plan.requirements.len(),
            self.config.package_dir.display()
        );

        Ok(Evaluation {
            plan,
            report,
            layout,
        })
    }
}
