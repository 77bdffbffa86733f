//! Repository file API client methods

use crate::api::client::{check_status, RequestBody};
use crate::api::models::RepositoryFileAcl;
use crate::api::PentahoClient;
use crate::error::{CliError, CliResult};
use reqwest::{Method, StatusCode};

/// Repository paths are addressed with ':' in place of '/'
fn encode_path(path: &str) -> String {
    path.replace('/', ":")
}

impl PentahoClient {
    /// Fetch the ACL of a repository file
    pub async fn get_file_acl(&self, path: &str) -> CliResult<RepositoryFileAcl> {
        let endpoint = format!("api/repo/files/{}/acl", encode_path(path));
        let response = self
            .send(Method::GET, &endpoint, &[], RequestBody::Empty)
            .await?;

        if response.status == StatusCode::NOT_FOUND {
            return Err(CliError::NotFound(format!("Repository file not found: {path}")));
        }
        check_status(
            response,
            &[
                (400, "Failed to read the ACL of the file"),
                (403, "Not allowed to read the ACL of the file"),
            ],
        )?
        .json()
    }

    /// Move repository files to the trash
    ///
    /// Every path is resolved to its file id first; one missing path fails
    /// the whole call before anything is deleted.
    pub async fn delete_files(&self, paths: &[String]) -> CliResult<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            let acl = self.get_file_acl(path).await?;
            ids.push(acl.id);
        }
        let body = ids.join(",");

        self.logger().verbose_with_context(
            "repository",
            "Deleting files",
            &[("paths", paths.join(",").as_str())],
        );
        self.put(
            "api/repo/files/delete",
            &[],
            RequestBody::Text(&body),
            &[(
                500,
                "Failure to move the files specified in the comma-separated list to the trash",
            )],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("/home/bob"), ":home:bob");
    }
}
