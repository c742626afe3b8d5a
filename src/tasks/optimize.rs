// src/tasks/optimize.rs

//! `optimize`: minification, image re-encoding, asset hashing and cache
//! headers through the configured [`AssetOptimizer`].
//!
//! [`AssetOptimizer`]: crate::services::AssetOptimizer

use tracing::info;

use crate::engine::ExecutionContext;
use crate::errors::{Result, SitepipeError};
use crate::report::{SummaryOptions, summarize_optimize};
use crate::services::{OptimizeRequest, Services};
use crate::tasks::audit::{MAX_HTML_FILES, scoped_include, site_root, skip_message};
use crate::tasks::{EXCLUDE, TaskInput, TaskOutput};

pub const MINIFY_HTML: &[&str] = &["minifyHtml"];
pub const MINIFY_HTML_DEFAULT: bool = true;
pub const MINIFY_CSS: &[&str] = &["minifyCss"];
pub const MINIFY_CSS_DEFAULT: bool = true;
pub const MINIFY_JS: &[&str] = &["minifyJs"];
pub const MINIFY_JS_DEFAULT: bool = true;
pub const OPTIMIZE_IMAGES: &[&str] = &["optimizeImages", "images"];
pub const OPTIMIZE_IMAGES_DEFAULT: bool = true;
pub const HASH_ASSETS: &[&str] = &["hashAssets", "fingerprintAssets"];
pub const HASH_ASSETS_DEFAULT: bool = true;
pub const CACHE_HEADERS: &[&str] = &["cacheHeaders", "writeCacheHeaders"];
pub const CACHE_HEADERS_DEFAULT: bool = true;

pub async fn run(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    let options = input.options;
    let root = site_root(options, ctx)?;
    let Some(include) = scoped_include(options, ctx, &root)? else {
        let message = skip_message("optimize", &root);
        info!(step = %input.label, "{message}");
        return Ok(TaskOutput::message(message));
    };

    let request = OptimizeRequest {
        site_root: root,
        include,
        exclude: options.get_list(EXCLUDE)?,
        minify_html: options.get_or(MINIFY_HTML, MINIFY_HTML_DEFAULT)?,
        minify_css: options.get_or(MINIFY_CSS, MINIFY_CSS_DEFAULT)?,
        minify_js: options.get_or(MINIFY_JS, MINIFY_JS_DEFAULT)?,
        optimize_images: options.get_or(OPTIMIZE_IMAGES, OPTIMIZE_IMAGES_DEFAULT)?,
        hash_assets: options.get_or(HASH_ASSETS, HASH_ASSETS_DEFAULT)?,
        cache_headers: options.get_or(CACHE_HEADERS, CACHE_HEADERS_DEFAULT)?,
        max_html_files: options.get_or(MAX_HTML_FILES, 0)?,
        options: options.as_map().clone(),
    };

    info!(
        root = %request.site_root.display(),
        include = request.include.len(),
        images = request.optimize_images,
        hash_assets = request.hash_assets,
        "optimizing assets"
    );
    let report = services.optimizer.optimize(&request).await?;
    let line = summarize_optimize(&report, &SummaryOptions::from_options(options)?);
    if report.success {
        Ok(TaskOutput::message(line))
    } else {
        Err(SitepipeError::TaskFailed(line))
    }
}
