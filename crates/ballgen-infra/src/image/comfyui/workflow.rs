//! Text-to-image workflow graph in ComfyUI's API format.
//!
//! Node ids are fixed; [`SAVE_NODE`] is where the finished image shows up in
//! `/history` outputs.

use serde_json::{Value, json};

use ballgen_types::config::ImageSettings;
use ballgen_types::image::ImageSize;

pub const SAMPLER_NODE: &str = "3";
pub const CHECKPOINT_NODE: &str = "4";
pub const LATENT_NODE: &str = "5";
pub const POSITIVE_NODE: &str = "6";
pub const NEGATIVE_NODE: &str = "7";
pub const DECODE_NODE: &str = "8";
pub const SAVE_NODE: &str = "9";

/// Prompt with the configured style suffix appended.
pub fn positive_text(prompt: &str, style_suffix: &str) -> String {
    let style_suffix = style_suffix.trim();
    if style_suffix.is_empty() {
        prompt.to_string()
    } else {
        format!("{prompt}, {style_suffix}")
    }
}

pub fn build_workflow(settings: &ImageSettings, size: ImageSize, prompt: &str, seed: u64) -> Value {
    json!({
        "3": {
            "class_type": "KSampler",
            "inputs": {
                "seed": seed,
                "steps": settings.steps,
                "cfg": settings.cfg,
                "sampler_name": settings.sampler_name,
                "scheduler": settings.scheduler,
                "denoise": 1,
                "model": [CHECKPOINT_NODE, 0],
                "positive": [POSITIVE_NODE, 0],
                "negative": [NEGATIVE_NODE, 0],
                "latent_image": [LATENT_NODE, 0]
            }
        },
        "4": {
            "class_type": "CheckpointLoaderSimple",
            "inputs": { "ckpt_name": settings.model }
        },
        "5": {
            "class_type": "EmptyLatentImage",
            "inputs": { "batch_size": 1, "width": size.width, "height": size.height }
        },
        "6": {
            "class_type": "CLIPTextEncode",
            "inputs": {
                "text": positive_text(prompt, &settings.style_suffix),
                "clip": [CHECKPOINT_NODE, 1]
            }
        },
        "7": {
            "class_type": "CLIPTextEncode",
            "inputs": { "text": settings.negative_prompt, "clip": [CHECKPOINT_NODE, 1] }
        },
        "8": {
            "class_type": "VAEDecode",
            "inputs": { "samples": [SAMPLER_NODE, 0], "vae": [CHECKPOINT_NODE, 2] }
        },
        "9": {
            "class_type": "SaveImage",
            "inputs": { "filename_prefix": "ballgen", "images": [DECODE_NODE, 0] }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_wires_nodes() {
        let settings = ImageSettings::default();
        let size = ImageSize {
            width: 768,
            height: 512,
        };
        let workflow = build_workflow(&settings, size, "family-friendly, safe, golf ball", 42);

        assert_eq!(workflow[SAMPLER_NODE]["class_type"], "KSampler");
        assert_eq!(workflow[SAMPLER_NODE]["inputs"]["seed"], 42);
        assert_eq!(workflow[SAMPLER_NODE]["inputs"]["steps"], 30);
        assert_eq!(workflow[SAMPLER_NODE]["inputs"]["sampler_name"], "dpmpp_2m");
        assert_eq!(workflow[SAMPLER_NODE]["inputs"]["latent_image"], json!(["5", 0]));
        assert_eq!(workflow[CHECKPOINT_NODE]["inputs"]["ckpt_name"], settings.model);
        assert_eq!(workflow[LATENT_NODE]["inputs"]["width"], 768);
        assert_eq!(workflow[LATENT_NODE]["inputs"]["height"], 512);
        assert_eq!(workflow[NEGATIVE_NODE]["inputs"]["text"], settings.negative_prompt);
        assert_eq!(workflow[DECODE_NODE]["inputs"]["vae"], json!(["4", 2]));
        assert_eq!(workflow[SAVE_NODE]["inputs"]["images"], json!(["8", 0]));

        let positive = workflow[POSITIVE_NODE]["inputs"]["text"].as_str().unwrap();
        assert!(positive.starts_with("family-friendly, safe, golf ball, cute and humorous"));
    }

    #[test]
    fn test_positive_text_without_suffix() {
        assert_eq!(positive_text("ball", "  "), "ball");
        assert_eq!(positive_text("ball", "4k"), "ball, 4k");
    }
}
