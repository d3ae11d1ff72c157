//! Typed templates for the generated CI workflows and community documents.
//!
//! Each template is a struct whose fields are exactly its placeholders.
//! `vars()` destructures `self`, so adding a field without wiring it into the
//! layout does not compile.

use crate::defaults::{LaunchConfig, StackConfig};
use crate::utils::template;

use super::GeneratedArtifact;

pub trait Template {
    /// Path relative to the project root.
    const PATH: &'static str;
    const LAYOUT: &'static str;

    fn vars(&self) -> Vec<(&'static str, String)>;

    fn render(&self) -> String {
        let vars = self.vars();
        let pairs: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (*k, v.as_str())).collect();
        template::render(Self::LAYOUT, &pairs)
    }
}

pub fn artifact<T: Template>(template: &T) -> GeneratedArtifact {
    GeneratedArtifact {
        path: T::PATH,
        content: template.render(),
    }
}

// =============================================================================
// Workflows
// =============================================================================

pub struct BuildWorkflow {
    pub node_versions: Vec<String>,
}

impl Template for BuildWorkflow {
    const PATH: &'static str = ".github/workflows/build.yml";
    const LAYOUT: &'static str = r#"name: Build & Test

on:
  push:
    branches: [main, develop]
  pull_request:
    branches: [main]

jobs:
  build:
    runs-on: ubuntu-latest
    strategy:
      matrix:
        node-version: [{{node_versions}}]

    steps:
      - uses: actions/checkout@v4

      - name: Setup Node.js ${{ matrix.node-version }}
        uses: actions/setup-node@v4
        with:
          node-version: ${{ matrix.node-version }}
          cache: 'npm'

      - name: Install dependencies
        run: npm ci

      - name: Type check
        run: npm run type-check || true

      - name: Lint
        run: npm run lint || true

      - name: Build
        run: npm run build

      - name: Archive build
        if: always()
        uses: actions/upload-artifact@v4
        with:
          name: build-${{ matrix.node-version }}
          path: dist/
          retention-days: 5
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        let Self { node_versions } = self;
        let matrix = node_versions
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(", ");
        vec![("node_versions", matrix)]
    }
}

pub struct DockerWorkflow {
    pub image_name: String,
}

impl Template for DockerWorkflow {
    const PATH: &'static str = ".github/workflows/docker.yml";
    const LAYOUT: &'static str = r#"name: Docker Build & Push

on:
  push:
    branches: [main]
    tags: ['v*']
  pull_request:
    branches: [main]

jobs:
  docker:
    runs-on: ubuntu-latest
    permissions:
      contents: read
      packages: write

    steps:
      - uses: actions/checkout@v4
        with:
          fetch-depth: 0

      - name: Set up Docker Buildx
        uses: docker/setup-buildx-action@v3

      - name: Set version
        id: version
        run: |
          if [[ "${{ github.ref }}" == refs/tags/* ]]; then
            echo "tag=${{ github.ref_name }}" >> $GITHUB_OUTPUT
          else
            echo "tag=latest" >> $GITHUB_OUTPUT
          fi

      - name: Build Docker image
        uses: docker/build-push-action@v5
        with:
          context: .
          push: false
          load: true
          tags: {{image_name}}:${{ steps.version.outputs.tag }}
          cache-from: type=gha
          cache-to: type=gha,mode=max

      - name: Test Docker image
        run: |
          docker run --rm {{image_name}}:${{ steps.version.outputs.tag }} node --version
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        let Self { image_name } = self;
        vec![("image_name", image_name.clone())]
    }
}

pub struct ReleaseWorkflow {
    pub node_version: String,
}

impl Template for ReleaseWorkflow {
    const PATH: &'static str = ".github/workflows/release.yml";
    const LAYOUT: &'static str = r#"name: Release

on:
  push:
    tags: ['v*']

jobs:
  release:
    runs-on: ubuntu-latest
    permissions:
      contents: write

    steps:
      - uses: actions/checkout@v4
        with:
          fetch-depth: 0

      - name: Setup Node.js
        uses: actions/setup-node@v4
        with:
          node-version: '{{node_version}}'
          cache: 'npm'

      - name: Install & build
        run: |
          npm ci
          npm run build

      - name: Create release
        uses: softprops/action-gh-release@v1
        with:
          draft: false
          prerelease: false
          generate_release_notes: true
        env:
          GITHUB_TOKEN: ${{ secrets.GITHUB_TOKEN }}
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        let Self { node_version } = self;
        vec![("node_version", node_version.clone())]
    }
}

// =============================================================================
// Issue and pull request templates
// =============================================================================

pub struct BugReport;

impl Template for BugReport {
    const PATH: &'static str = ".github/ISSUE_TEMPLATE/bug_report.md";
    const LAYOUT: &'static str = r#"---
name: Bug Report
about: Report a bug
title: '[BUG] '
labels: bug
---

## Description
<!-- Clear description -->

## Steps to Reproduce
1.
2.

## Expected Behavior
<!-- What should happen -->

## Actual Behavior
<!-- What actually happens -->

## Environment
- Node version:
- npm version:
- OS:
- Docker version:
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub struct FeatureRequest;

impl Template for FeatureRequest {
    const PATH: &'static str = ".github/ISSUE_TEMPLATE/feature_request.md";
    const LAYOUT: &'static str = r#"---
name: Feature Request
about: Suggest a feature
title: '[FEATURE] '
labels: enhancement
---

## Description
<!-- Clear description -->

## Motivation
<!-- Why is this needed? -->

## Use Case
<!-- How would it be used? -->
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub struct PullRequestTemplate;

impl Template for PullRequestTemplate {
    const PATH: &'static str = "PULL_REQUEST_TEMPLATE.md";
    const LAYOUT: &'static str = r#"## Description
<!-- Clear description of changes -->

## Type
- [ ] Bug fix
- [ ] New feature
- [ ] Breaking change
- [ ] Documentation

## Checklist
- [ ] Code follows guidelines
- [ ] TypeScript passes type checking
- [ ] ESLint passes
- [ ] Tests pass
- [ ] Documentation updated
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =============================================================================
// Community files
// =============================================================================

pub struct CodeOfConduct;

impl Template for CodeOfConduct {
    const PATH: &'static str = "CODE_OF_CONDUCT.md";
    const LAYOUT: &'static str = r#"# Contributor Covenant Code of Conduct

## Our Pledge
We are committed to providing a welcoming and inspiring community for all.

## Our Standards
- Using welcoming and inclusive language
- Being respectful of differing opinions
- Gracefully accepting constructive criticism
- Focusing on what is best for the community
- Showing empathy towards other community members
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub struct Contributing {
    pub display_name: String,
    pub project: String,
}

impl Template for Contributing {
    const PATH: &'static str = "CONTRIBUTING.md";
    const LAYOUT: &'static str = r#"# Contributing to {{display_name}}

## Development Setup
1. Clone: `git clone https://github.com/yourname/{{project}}`
2. Install: `npm install`
3. Create branch: `git checkout -b feature/name`
4. Code and test
5. Commit: `git commit -m "feat: description"`
6. Push and create PR

## Commit Format
type(scope): subject

Examples:
- feat(cache): add TTL configuration
- fix(scanner): handle corrupted files
- docs(readme): update instructions
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        let Self {
            display_name,
            project,
        } = self;
        vec![
            ("display_name", display_name.clone()),
            ("project", project.clone()),
        ]
    }
}

pub struct SecurityPolicy {
    pub contact: String,
}

impl Template for SecurityPolicy {
    const PATH: &'static str = "SECURITY.md";
    const LAYOUT: &'static str = r#"# Security Policy

## Reporting Vulnerabilities
Email {{contact}} with:
- Description
- Steps to reproduce
- Potential impact

Do NOT open a public issue for security vulnerabilities.

## Supported Versions
| Version | Supported |
|---------|-----------|
| 1.x     | ✓ Yes     |
| 0.x     | ✗ No      |
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        let Self { contact } = self;
        vec![("contact", contact.clone())]
    }
}

// =============================================================================
// Deployment environment
// =============================================================================

pub struct EnvTemplate {
    pub mount_env_var: String,
    pub project_name: String,
    pub port: u16,
    pub cache_ttl: u64,
    pub cache_max_size: u32,
    pub hot_reload: bool,
}

impl EnvTemplate {
    pub fn from_stack(stack: &StackConfig) -> Self {
        Self {
            mount_env_var: stack.mount_env_var.clone(),
            project_name: stack.service.clone(),
            port: stack.port,
            cache_ttl: stack.cache_ttl_ms,
            cache_max_size: stack.cache_max_size,
            hot_reload: stack.hot_reload,
        }
    }
}

impl Template for EnvTemplate {
    const PATH: &'static str = ".env.portainer";
    const LAYOUT: &'static str = r#"# Portainer Environment Configuration
# Copy this to your .env file before deployment

{{mount_env_var}}=/path/to/samples
COMPOSE_PROJECT_NAME={{project_name}}
PORT={{port}}
CACHE_TTL={{cache_ttl}}
CACHE_MAX_SIZE={{cache_max_size}}
HOT_RELOAD={{hot_reload}}
"#;

    fn vars(&self) -> Vec<(&'static str, String)> {
        let Self {
            mount_env_var,
            project_name,
            port,
            cache_ttl,
            cache_max_size,
            hot_reload,
        } = self;
        vec![
            ("mount_env_var", mount_env_var.clone()),
            ("project_name", project_name.clone()),
            ("port", port.to_string()),
            ("cache_ttl", cache_ttl.to_string()),
            ("cache_max_size", cache_max_size.to_string()),
            ("hot_reload", hot_reload.to_string()),
        ]
    }
}

/// Every non-stack artifact, in publication order.
pub fn render_documents(config: &LaunchConfig, display_name: &str) -> Vec<GeneratedArtifact> {
    vec![
        artifact(&BuildWorkflow {
            node_versions: config.workflows.node_versions.clone(),
        }),
        artifact(&DockerWorkflow {
            image_name: config.stack.service.clone(),
        }),
        artifact(&ReleaseWorkflow {
            node_version: config.workflows.release_node_version.clone(),
        }),
        artifact(&BugReport),
        artifact(&FeatureRequest),
        artifact(&PullRequestTemplate),
        artifact(&CodeOfConduct),
        artifact(&Contributing {
            display_name: display_name.to_string(),
            project: config.stack.service.clone(),
        }),
        artifact(&SecurityPolicy {
            contact: config.community.security_contact.clone(),
        }),
    ]
}
