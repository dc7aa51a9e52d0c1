//! Phase orchestration (spec.md §6/§7): read the source file, run each
//! pass in order, stop at the first phase that reports an error, and
//! render every diagnostic collected so far before returning.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use gdsc_codegen::{emit_assembly, emit_executable, emit_object, prepare, EmitFormat, Platform};
use gdsc_util::Handler;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to open input file '{path}': {source}")]
    FileOpen { path: String, source: std::io::Error },

    #[error("failed to write output file '{path}': {source}")]
    FileWrite { path: String, source: std::io::Error },

    /// A pass reported at least one error; the diagnostics themselves
    /// have already been rendered to stderr by [`run`] by the time this
    /// is returned.
    #[error("compilation failed with diagnostics")]
    DiagnosticsReported,

    #[error("code generation failed: {0}")]
    Lowering(#[from] gdsc_ir::LowerError),
}

/// Runs the full pipeline for `config`, writing whichever output files
/// the selected format calls for. Returns `Ok(())` only when every
/// phase reported zero errors (warnings are non-fatal throughout).
pub fn run(config: &Config) -> Result<(), CompileError> {
    let input_name = config.input.to_string_lossy().into_owned();
    info!(input = %input_name, platform = ?config.platform, format = ?config.format, "compiling");

    let source = fs::read_to_string(&config.input).map_err(|source| CompileError::FileOpen { path: input_name.clone(), source })?;

    let mut all_diagnostics = Handler::new();

    let (tokens, lex_handler) = gdsc_lex::tokenize(&source);
    debug!(tokens = tokens.len(), errors = lex_handler.error_count(), "lexing complete");
    let lex_failed = lex_handler.has_errors();
    all_diagnostics.extend(lex_handler);
    if lex_failed {
        render(&all_diagnostics, &input_name);
        return Err(CompileError::DiagnosticsReported);
    }

    let (program, parse_handler) = gdsc_par::parse(&tokens);
    debug!(statements = program.statements.len(), errors = parse_handler.error_count(), "parsing complete");
    let parse_failed = parse_handler.has_errors();
    all_diagnostics.extend(parse_handler);
    if parse_failed {
        render(&all_diagnostics, &input_name);
        return Err(CompileError::DiagnosticsReported);
    }

    let analysis = gdsc_sem::analyze(&program);
    debug!(
        errors = analysis.handler.error_count(),
        warnings = analysis.handler.warning_count(),
        "semantic analysis complete"
    );
    let sem_failed = analysis.handler.has_errors();
    for diagnostic in analysis.handler.diagnostics() {
        all_diagnostics.emit(diagnostic.clone());
    }
    if sem_failed {
        render(&all_diagnostics, &input_name);
        return Err(CompileError::DiagnosticsReported);
    }

    let mut module = gdsc_ir::lower_program(&program, &analysis)?;
    debug!(functions = module.functions.len(), "IR lowering complete");

    prepare(&mut module);

    write_outputs(config, &module)?;
    render(&all_diagnostics, &input_name);
    info!(output = %config.output.to_string_lossy(), "compilation succeeded");
    Ok(())
}

/// Output layering from spec.md §6: `assembly` always writes `<output>.s`;
/// `object` additionally writes the `GDOBJ` blob; `executable`
/// additionally writes the native container.
fn write_outputs(config: &Config, module: &gdsc_ir::Module) -> Result<(), CompileError> {
    let asm_path = with_extension(&config.output, "s");
    write_file(&asm_path, emit_assembly(module).as_bytes())?;

    if matches!(config.format, EmitFormat::Object | EmitFormat::Executable) {
        let object_path = with_extension(&config.output, "o");
        write_file(&object_path, &emit_object(module))?;
    }

    if config.format == EmitFormat::Executable {
        let exe_path = executable_path(&config.output, config.platform);
        write_file(&exe_path, &emit_executable(module, config.platform))?;
    }

    Ok(())
}

fn with_extension(output: &Path, ext: &str) -> std::path::PathBuf {
    let mut path = output.to_path_buf();
    path.set_extension(ext);
    path
}

fn executable_path(output: &Path, platform: Platform) -> std::path::PathBuf {
    let ext = platform.executable_extension();
    if ext.is_empty() {
        output.to_path_buf()
    } else {
        let mut name = output.as_os_str().to_os_string();
        name.push(ext);
        std::path::PathBuf::from(name)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CompileError> {
    fs::write(path, bytes).map_err(|source| CompileError::FileWrite { path: path.to_string_lossy().into_owned(), source })
}

fn render(handler: &Handler, file_name: &str) {
    for diagnostic in handler.diagnostics() {
        eprintln!("{}", diagnostic.render(file_name));
    }
}
