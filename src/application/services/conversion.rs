//! Record conversion service
//!
//! Detects the format of each input file, decodes it with the legacy
//! encoding of that format, runs the core pipeline and writes the SGF next
//! to the input (or into the configured output directory).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::application::convert::{convert, parse_normalized};
use crate::application::format::Format;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::PropertyTree;
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// Result of converting one input file.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    /// Path of the written record, or why the conversion failed
    pub result: ApplicationResult<PathBuf>,
}

impl ConversionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service converting legacy record files to SGF.
pub struct ConversionService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ConversionService {
    /// Create a new conversion service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Format of `path`, from its extension.
    pub fn detect(&self, path: &Path) -> ApplicationResult<Format> {
        Format::from_path(path).ok_or_else(|| ApplicationError::UnknownFormat(path.to_path_buf()))
    }

    /// Text encoding for `format`: the configured override or the registry default.
    pub fn encoding_for(&self, format: Format) -> ApplicationResult<&'static Encoding> {
        match self.settings.encoding_override(format.extension()) {
            Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                ApplicationError::UnknownEncoding {
                    format: format.to_string(),
                    label: label.to_string(),
                }
            }),
            None => Ok(format.encoding()),
        }
    }

    /// Read and decode `path` as `format`.
    pub fn read_text(&self, path: &Path, format: Format) -> ApplicationResult<String> {
        let bytes = self.fs.read(path).with_path_context("read record", path)?;
        let encoding = self.encoding_for(format)?;
        let (text, used, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{}: invalid {} sequences replaced",
                path.display(),
                used.name()
            );
        }
        Ok(text.into_owned())
    }

    /// Where the converted record for `input` is written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        input.with_output_extension(
            &self.settings.output_extension,
            self.settings.output_dir.as_deref(),
        )
    }

    /// Parsed and normalized tree of `input`.
    pub fn load_tree(&self, input: &Path) -> ApplicationResult<PropertyTree> {
        let format = self.detect(input)?;
        let text = self.read_text(input, format)?;
        Ok(parse_normalized(&text, format)?)
    }

    /// SGF text of `input`, without writing anything.
    pub fn render(&self, input: &Path) -> ApplicationResult<String> {
        let format = self.detect(input)?;
        let text = self.read_text(input, format)?;
        Ok(convert(&text, format)?)
    }

    /// Convert one file and write its SGF output.
    #[instrument(level = "debug", skip(self))]
    pub fn convert_file(&self, input: &Path) -> ApplicationResult<PathBuf> {
        let output = self.output_path(input);
        if !self.settings.overwrite && self.fs.exists(&output) {
            return Err(ApplicationError::OutputExists(output));
        }

        let sgf = self.render(input)?;

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.fs
                .create_dir_all(dir)
                .with_path_context("create output directory", dir)?;
        }
        self.fs
            .write(&output, &sgf)
            .with_path_context("write sgf", &output)?;
        info!("{} -> {}", input.display(), output.display());
        Ok(output)
    }

    /// Expand directories into the record files they contain.
    ///
    /// Files named explicitly are kept whatever their extension, so an
    /// unknown format is reported for them. Inside directories only
    /// recognized extensions are picked up.
    pub fn collect_inputs(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut inputs = Vec::new();
        for path in paths {
            if !self.fs.is_dir(path) {
                inputs.push(path.clone());
                continue;
            }
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| Format::from_path(p).is_some())
                .collect();
            found.sort();
            debug!("{}: {} records", path.display(), found.len());
            inputs.extend(found);
        }
        inputs
    }

    /// Convert every input independently.
    ///
    /// A failing file never stops the others. Outcomes come back in input
    /// order.
    pub fn convert_all(&self, paths: &[PathBuf]) -> Vec<ConversionOutcome> {
        let inputs = self.collect_inputs(paths);
        inputs
            .par_iter()
            .map(|input| {
                let result = self.convert_file(input);
                if let Err(e) = &result {
                    warn!("{}: {}", input.display(), e);
                }
                ConversionOutcome {
                    input: input.clone(),
                    result,
                }
            })
            .collect()
    }
}
