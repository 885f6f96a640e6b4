use pixelops::{ChannelLayout, ImagePyramid, ImageView, OwnedImage, PixelOpsError};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1, ChannelLayout::Gray)
        .err()
        .unwrap();
    assert_eq!(
        err,
        PixelOpsError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 24];

    let err = ImageView::new(&data, 2, 2, 5, ChannelLayout::Rgb)
        .err()
        .unwrap();
    assert_eq!(
        err,
        PixelOpsError::InvalidStride {
            row_len: 6,
            stride: 5,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 11];

    let err = ImageView::from_slice(&data, 2, 2, ChannelLayout::Rgb)
        .err()
        .unwrap();
    assert_eq!(err, PixelOpsError::BufferTooSmall { needed: 12, got: 11 });
}

#[test]
fn owned_image_requires_exact_length() {
    let err = OwnedImage::new(vec![0u8; 13], 2, 2, ChannelLayout::Rgb).unwrap_err();
    assert_eq!(err, PixelOpsError::BufferTooSmall { needed: 12, got: 13 });
    assert!(matches!(
        ChannelLayout::from_channels(4),
        Err(PixelOpsError::InvalidChannels { channels: 4 })
    ));
}

#[test]
fn image_view_roi_addresses_channels() {
    let data: Vec<u8> = (0u8..48).collect();
    let view = ImageView::from_slice(&data, 4, 4, ChannelLayout::Rgb).unwrap();
    assert_eq!(view.stride(), 12);

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.stride(), 12);
    assert_eq!(roi.row(0).unwrap(), &[15u8, 16, 17, 18, 19, 20]);
    assert_eq!(roi.pixel(1, 1).unwrap(), &[30u8, 31, 32]);
    assert_eq!(roi.get(0, 0, 2).copied(), Some(17u8));
    assert!(roi.get(0, 0, 3).is_none());
    assert!(roi.get(2, 0, 0).is_none());

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        PixelOpsError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn image_info_reports_geometry() {
    let img = OwnedImage::zeros(5, 3, ChannelLayout::Rgb).unwrap();
    let info = img.info();
    assert_eq!((info.height, info.width, info.channels, info.size), (3, 5, 3, 45));
    let report = info.to_string();
    assert!(report.contains("Height: 3"));
    assert!(report.contains("Size (number of elements): 45"));
    assert!(report.ends_with("Data type: u8"));
}

#[test]
fn image_pyramid_halves_until_one_pixel() {
    let data: Vec<u8> = (0u8..16).collect();
    let base = OwnedImage::new(data, 4, 4, ChannelLayout::Gray).unwrap();

    let pyramid = ImagePyramid::build(&base, 10).unwrap();
    assert_eq!(pyramid.levels().len(), 3);

    let level1 = pyramid.level(1).unwrap();
    assert_eq!((level1.width(), level1.height()), (2, 2));
    let level2 = pyramid.level(2).unwrap();
    assert_eq!((level2.width(), level2.height()), (1, 1));
    assert!(pyramid.level(3).is_none());
}
