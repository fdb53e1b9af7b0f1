use std::path::Path;

use skelet_image::{Image, ImageSize};

use crate::error::IoError;

fn decode_any(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {}x{} {:?}",
        file_path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

/// Reads an image of any format supported by the `image` crate as 8-bit grayscale.
///
/// Color images are converted to luma by the decoder.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A single channel image.
pub fn read_image_any_gray8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode_any(file_path.as_ref())?;
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

/// Reads an image of any format supported by the `image` crate as 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A three channel image.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = decode_any(file_path.as_ref())?;
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes a grayscale image to a PNG file.
///
/// # Arguments
///
/// * `file_path` - The path of the PNG file to create.
/// * `image` - The image to write.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ExtendedColorType::L8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}

/// Writes an RGB image to a PNG file.
///
/// # Arguments
///
/// * `file_path` - The path of the PNG file to create.
/// * `image` - The image to write.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ExtendedColorType::Rgb8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("skeleton.png");

        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 3,
            },
            vec![0, 255, 0, 0, 0, 255, 255, 0, 0, 0, 0, 255],
        )?;
        write_image_png_gray8(&file_path, &image)?;

        let read = read_image_any_gray8(&file_path)?;
        assert_eq!(read, image);
        Ok(())
    }

    #[test]
    fn write_read_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("overlay.png");

        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![255, 0, 0, 0, 0, 0, 10, 20, 30, 255, 255, 255],
        )?;
        write_image_png_rgb8(&file_path, &image)?;

        assert_eq!(read_image_any_rgb8(&file_path)?, image);

        let gray = read_image_any_gray8(&file_path)?;
        assert_eq!(gray.size(), image.size());
        assert_eq!(gray.get_pixel(1, 0, 0)?, &0);
        assert_eq!(gray.get_pixel(1, 1, 0)?, &255);
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let result = read_image_any_gray8("does/not/exist.png");
        assert!(matches!(result, Err(IoError::FileDoesNotExist(_))));
    }
}
