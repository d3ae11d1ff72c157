//! docker-compose.yml rendering.
//!
//! The descriptor is built once from [`StackConfig`] and handed to a
//! [`StackRenderer`]. Both renderers must produce documents that parse to the
//! same YAML value.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::defaults::StackConfig;
use crate::error::Result;

pub const STACK_PATH: &str = "docker-compose.yml";

pub const COMPOSE_VERSION: &str = "3.8";

/// Environment keys other than the mount variable, in emission order.
pub const ENV_KEYS: [&str; 4] = ["PORT", "CACHE_TTL", "CACHE_MAX_SIZE", "HOT_RELOAD"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackDescriptor {
    pub version: String,
    pub services: BTreeMap<String, ServiceSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceSpec {
    pub image: String,
    pub container_name: String,
    pub restart: String,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
    pub environment: Environment,
    pub healthcheck: HealthCheck,
}

/// Ordered `KEY: "value"` block. Serialized as a map, preserving order.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment(pub Vec<(String, String)>);

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheck {
    pub test: Vec<String>,
    pub interval: String,
    pub timeout: String,
    pub retries: u32,
    pub start_period: String,
}

impl StackDescriptor {
    pub fn from_config(stack: &StackConfig) -> Self {
        let port = stack.port.to_string();

        let environment = Environment(vec![
            ("PORT".to_string(), port.clone()),
            (stack.mount_env_var.clone(), stack.mount_path.clone()),
            ("CACHE_TTL".to_string(), stack.cache_ttl_ms.to_string()),
            ("CACHE_MAX_SIZE".to_string(), stack.cache_max_size.to_string()),
            ("HOT_RELOAD".to_string(), stack.hot_reload.to_string()),
        ]);

        let service = ServiceSpec {
            image: stack.image.clone(),
            container_name: stack.service.clone(),
            restart: "unless-stopped".to_string(),
            ports: vec![format!("{}:{}", port, port)],
            volumes: vec![format!("${{{}}}:{}:ro", stack.mount_env_var, stack.mount_path)],
            environment,
            healthcheck: HealthCheck {
                test: vec![
                    "CMD".to_string(),
                    "curl".to_string(),
                    "-f".to_string(),
                    format!("http://localhost:{}{}", port, stack.health_path),
                ],
                interval: stack.health_interval.clone(),
                timeout: stack.health_timeout.clone(),
                retries: stack.health_retries,
                start_period: stack.health_start_period.clone(),
            },
        };

        let mut services = BTreeMap::new();
        services.insert(stack.service.clone(), service);

        Self {
            version: COMPOSE_VERSION.to_string(),
            services,
        }
    }
}

pub trait StackRenderer {
    fn name(&self) -> &'static str;

    fn render(&self, descriptor: &StackDescriptor) -> Result<String>;
}

/// Hand emitter. Always available and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualRenderer;

impl ManualRenderer {
    pub fn emit(&self, descriptor: &StackDescriptor) -> String {
        let mut out = String::new();
        out.push_str(&format!("version: {}\n", quote(&descriptor.version)));
        out.push_str("services:\n");

        for (name, service) in &descriptor.services {
            out.push_str(&format!("  {}:\n", name));
            out.push_str(&format!("    image: {}\n", quote(&service.image)));
            out.push_str(&format!(
                "    container_name: {}\n",
                quote(&service.container_name)
            ));
            out.push_str(&format!("    restart: {}\n", quote(&service.restart)));

            out.push_str("    ports:\n");
            for port in &service.ports {
                out.push_str(&format!("      - {}\n", quote(port)));
            }

            out.push_str("    volumes:\n");
            for volume in &service.volumes {
                out.push_str(&format!("      - {}\n", quote(volume)));
            }

            out.push_str("    environment:\n");
            for (key, value) in &service.environment.0 {
                out.push_str(&format!("      {}: {}\n", key, quote(value)));
            }

            let health = &service.healthcheck;
            let test = health
                .test
                .iter()
                .map(|part| quote(part))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str("    healthcheck:\n");
            out.push_str(&format!("      test: [{}]\n", test));
            out.push_str(&format!("      interval: {}\n", quote(&health.interval)));
            out.push_str(&format!("      timeout: {}\n", quote(&health.timeout)));
            out.push_str(&format!("      retries: {}\n", health.retries));
            out.push_str(&format!(
                "      start_period: {}\n",
                quote(&health.start_period)
            ));
        }

        out
    }
}

impl StackRenderer for ManualRenderer {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn render(&self, descriptor: &StackDescriptor) -> Result<String> {
        Ok(self.emit(descriptor))
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Structured emitter backed by `serde_yml`.
#[cfg(feature = "yaml")]
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlRenderer;

#[cfg(feature = "yaml")]
impl StackRenderer for YamlRenderer {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn render(&self, descriptor: &StackDescriptor) -> Result<String> {
        serde_yml::to_string(descriptor).map_err(|e| {
            crate::error::Error::internal_unexpected(format!(
                "Failed to serialize stack descriptor: {}",
                e
            ))
        })
    }
}

/// Structured renderer when compiled in, manual otherwise.
pub fn default_renderer() -> Box<dyn StackRenderer> {
    #[cfg(feature = "yaml")]
    {
        Box::new(YamlRenderer)
    }
    #[cfg(not(feature = "yaml"))]
    {
        Box::new(ManualRenderer)
    }
}

/// Render with `renderer`, dropping to the manual emitter if it fails.
pub fn render_with_fallback(renderer: &dyn StackRenderer, descriptor: &StackDescriptor) -> String {
    match renderer.render(descriptor) {
        Ok(content) => content,
        Err(err) => {
            log_warn!(
                "{} renderer failed ({}), falling back to manual output",
                renderer.name(),
                err.message
            );
            ManualRenderer.emit(descriptor)
        }
    }
}
