use image::{DynamicImage, GenericImageView};
use img_squeeze_action::utils::{format_file_size, is_image_file};
use img_squeeze_action::{resize_to_max_width, scaled_height, select_candidates, CompressionResult};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

proptest! {
    #[test]
    fn format_file_size_picks_largest_unit_below_1024(bytes in 1u64..=(1u64 << 50)) {
        let formatted = format_file_size(bytes);
        let (value, unit) = formatted.split_once(' ').unwrap();

        let mut expected_index = 0;
        let mut size = bytes as f64;
        while size >= 1024.0 && expected_index < 3 {
            size /= 1024.0;
            expected_index += 1;
        }
        let expected_unit = ["B", "KB", "MB", "GB"][expected_index];

        assert_eq!(unit, expected_unit);
        assert!(!value.ends_with('.'));
        if value.contains('.') {
            assert!(!value.ends_with('0'));
            assert!(value.split('.').nth(1).unwrap().len() <= 2);
        }
    }

    #[test]
    fn compression_result_invariants(
        sizes in prop::collection::vec((0u64..1_000_000, 0u64..1_000_000), 0..50)
    ) {
        let mut result = CompressionResult::default();
        let mut previous_saved = 0;

        for (original, compressed) in &sizes {
            result.total_images_processed += 1;
            result.record_savings(*original, *compressed);

            assert!(result.total_bytes_saved >= previous_saved);
            previous_saved = result.total_bytes_saved;
        }

        assert!(result.compressed_count <= result.total_images_processed);
        let expected: u64 = sizes
            .iter()
            .map(|(o, c)| o.saturating_sub(*c))
            .sum();
        assert_eq!(result.total_bytes_saved, expected);
    }

    #[test]
    fn resize_preserves_aspect_ratio(
        width in 2u32..=160,
        height in 1u32..=160,
        max_width_seed in 1u32..=159
    ) {
        let max_width = 1 + max_width_seed % (width - 1);
        prop_assume!(max_width < width);

        let mut img = DynamicImage::new_rgb8(width, height);
        let resized = resize_to_max_width(&mut img, Some(max_width));

        let expected_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        assert_eq!(resized, Some((max_width, expected_height)));
        assert_eq!(img.dimensions(), (max_width, expected_height));
        assert_eq!(scaled_height(width, height, max_width), expected_height);
    }

    #[test]
    fn disabled_max_width_never_resizes(width in 1u32..=400, height in 1u32..=400) {
        let mut img = DynamicImage::new_rgb8(width, height);

        assert_eq!(resize_to_max_width(&mut img, None), None);
        assert_eq!(img.dimensions(), (width, height));
    }

    #[test]
    fn only_supported_extensions_are_images(
        stem in "[a-z0-9_-]{1,12}",
        extension in prop::sample::select(vec!["jpg", "JPG", "jpeg", "JpEg", "png", "PNG", "gif", "webp", "bmp", "txt", "svg"])
    ) {
        let filename = format!("{}.{}", stem, extension);
        let expected = matches!(extension.to_lowercase().as_str(), "jpg" | "jpeg" | "png");
        assert_eq!(is_image_file(Path::new(&filename)), expected);
    }

    #[test]
    fn paths_outside_target_are_never_selected(
        target in "[a-z]{1,8}/[a-z]{1,8}",
        other in "[a-z]{1,8}",
        file in "[a-z]{1,8}\\.png"
    ) {
        let inside = PathBuf::from(format!("{}/{}", target.to_uppercase(), file));
        let outside = PathBuf::from(format!("{}/{}", other, file));
        prop_assume!(!other.starts_with(target.split('/').next().unwrap()));

        let selected = select_candidates(&[inside.clone(), outside], Path::new(&target));
        assert_eq!(selected, vec![inside]);
    }
}
