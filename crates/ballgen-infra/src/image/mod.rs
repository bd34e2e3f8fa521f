//! Image backend implementations and the [`create_image_provider`] factory.

pub mod comfyui;
pub mod dalle;

use secrecy::SecretString;

use ballgen_core::image::box_provider::BoxImageProvider;
use ballgen_types::config::ImageSettings;
use ballgen_types::image::{ImageError, ImageProviderType};

use self::comfyui::ComfyUiProvider;
use self::dalle::DalleProvider;

/// Create a [`BoxImageProvider`] for the backend selected in `settings`.
///
/// # Errors
///
/// [`ImageError::MissingApiKey`] when DALL-E is selected without a key, and
/// [`ImageError::InvalidSettings`] for an unparseable ComfyUI resolution.
pub fn create_image_provider(
    settings: &ImageSettings,
    api_key: Option<&SecretString>,
) -> Result<BoxImageProvider, ImageError> {
    match settings.provider {
        ImageProviderType::ComfyUi => Ok(BoxImageProvider::new(ComfyUiProvider::new(settings)?)),
        ImageProviderType::Dalle => {
            let key = api_key.ok_or_else(|| ImageError::MissingApiKey("dalle".to_string()))?;
            Ok(BoxImageProvider::new(DalleProvider::new(settings, key.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_comfyui_by_default() {
        let provider = create_image_provider(&ImageSettings::default(), None).unwrap();
        assert_eq!(provider.name(), "comfyui");
    }

    #[test]
    fn test_factory_dalle_requires_key() {
        let settings = ImageSettings {
            provider: ImageProviderType::Dalle,
            ..ImageSettings::default()
        };
        assert!(matches!(
            create_image_provider(&settings, None),
            Err(ImageError::MissingApiKey(_))
        ));

        let key = SecretString::from("sk-test".to_string());
        let provider = create_image_provider(&settings, Some(&key)).unwrap();
        assert_eq!(provider.name(), "dalle");
    }

    #[test]
    fn test_factory_rejects_bad_resolution() {
        let settings = ImageSettings {
            resolution: "huge".to_string(),
            ..ImageSettings::default()
        };
        assert!(matches!(
            create_image_provider(&settings, None),
            Err(ImageError::InvalidSettings(_))
        ));
    }
}
