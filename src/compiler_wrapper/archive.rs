//! Archive patching for static-library crates
//!
//! rustc packs a crate's codegen units into the static library as separate
//! members, while a single bitcode file covers the whole crate. Matching
//! members are extracted into a private directory, each gets the crate's
//! bitcode path attached, and the caller repacks them.

use std::path::{Path, PathBuf};

use crate::{
    arg_parser::CompileMode,
    attach::{Attachment, attach_bitcode_path_to_object},
    compiler_wrapper::Builder,
    config::WllvmConfig,
    error::Error,
    utils::{absolute_filepath, execute_command_for_output, execute_command_in_dir},
};

/// Member names of `archive_filepath`, or `None` if the archiver cannot list it
pub fn list_archive_members<P>(builder: &Builder, archive_filepath: P) -> Option<Vec<String>>
where
    P: AsRef<Path>,
{
    let archive_filepath = archive_filepath.as_ref();
    let archiver = builder.archiver_command();
    let args = [
        "t".to_string(),
        archive_filepath.to_string_lossy().into_owned(),
    ];

    let output = match execute_command_for_output(&archiver[0], &args) {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!("Failed to run {:?}: {}", archiver[0], err);
            return None;
        }
    };
    if !output.status.success() {
        tracing::debug!(
            "Failed to list archive files of {:?}: {}",
            archive_filepath,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    Some(
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Extract the members of `archive_filepath` whose names contain
/// `crate_name` into `work_dir` and attach `bitcode_filepath` to each.
///
/// Returns the patched members. An archive that cannot be listed yields no
/// members; a member that fails to extract is skipped.
pub fn patch_archive_members<P, Q, R>(
    builder: &Builder,
    archive_filepath: P,
    crate_name: &str,
    bitcode_filepath: Q,
    work_dir: R,
    config: &WllvmConfig,
) -> Result<Vec<PathBuf>, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let archive_filepath = absolute_filepath(archive_filepath)?;
    let bitcode_filepath = absolute_filepath(bitcode_filepath)?;
    let work_dir = work_dir.as_ref();

    let Some(members) = list_archive_members(builder, &archive_filepath) else {
        return Ok(vec![]);
    };

    let mut patched_members = vec![];
    for member in members.iter().filter(|member| member.contains(crate_name)) {
        tracing::debug!("Extracting {} from {:?}", member, archive_filepath);

        let mut args = builder.archiver_command();
        args.extend([
            "x".to_string(),
            archive_filepath.to_string_lossy().into_owned(),
            member.clone(),
        ]);
        match execute_command_in_dir(&args, CompileMode::Archiving, work_dir) {
            Ok(0) => {}
            Ok(code) => {
                tracing::info!("Failed to extract {} (exit code {})", member, code);
                continue;
            }
            Err(err) => {
                tracing::info!("Failed to extract {}: {}", member, err);
                continue;
            }
        }

        let member_filepath = work_dir.join(member);
        tracing::debug!(
            "Prepare to attach {:?} to {:?}",
            bitcode_filepath,
            member_filepath
        );
        match attach_bitcode_path_to_object(&bitcode_filepath, &member_filepath, config)? {
            Attachment::Embedded => patched_members.push(member_filepath),
            attachment => tracing::debug!("{} left out: {:?}", member, attachment),
        }
    }

    Ok(patched_members)
}
