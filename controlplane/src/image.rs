/*
Copyright 2024 The Kubernetes Authors.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::sync::OnceLock;

use tracing::debug;

// The HAProxy image the controller deploys. It is pinned once at startup.
static LOADBALANCER_IMAGE: ImagePin = ImagePin::new();

/// A string that can be written exactly once.
///
/// The first call to [`ImagePin::set`] wins, even when several callers race,
/// and every later call is ignored. Reads before the first write return an
/// empty string.
#[derive(Debug, Default)]
pub struct ImagePin(OnceLock<String>);

impl ImagePin {
    pub const fn new() -> Self {
        ImagePin(OnceLock::new())
    }

    pub fn set(&self, image: impl Into<String>) {
        let image = image.into();
        if let Err(ignored) = self.0.set(image) {
            debug!(
                pinned = self.get(),
                ignored = ignored.as_str(),
                "image already pinned"
            );
        }
    }

    pub fn get(&self) -> &str {
        self.0.get().map(String::as_str).unwrap_or_default()
    }
}

pub fn set_loadbalancer_image(image: impl Into<String>) {
    LOADBALANCER_IMAGE.set(image);
}

pub fn get_loadbalancer_image() -> &'static str {
    LOADBALANCER_IMAGE.get()
}
