use std::fmt;

use super::*;

fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, BufferCoords> {
    geometry::rect(x, y, w, h)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSource {
    pub size: Size<i32, BufferCoords>,
    pub shm: bool,
}

impl TestSource {
    pub fn shm(w: i32, h: i32) -> Self {
        Self {
            size: Size::from((w, h)),
            shm: true,
        }
    }

    pub fn dmabuf(w: i32, h: i32) -> Self {
        Self {
            size: Size::from((w, h)),
            shm: false,
        }
    }
}

impl PixelSource for TestSource {
    fn size(&self) -> Size<i32, BufferCoords> {
        self.size
    }

    fn is_shm(&self) -> bool {
        self.shm
    }
}

/// Texture handle numbered in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestTexture(pub u32);

#[derive(Debug)]
pub struct TestImportError;

impl fmt::Display for TestImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("test import error")
    }
}

impl Error for TestImportError {}

#[derive(Debug, Default)]
pub struct TestImporter {
    pub imports: u32,
    pub updates: Vec<Vec<Rectangle<i32, BufferCoords>>>,
    pub fail_imports: bool,
    pub fail_updates: bool,
}

impl TextureImporter for TestImporter {
    type Source = TestSource;
    type Texture = TestTexture;
    type Error = TestImportError;

    fn import_buffer(&mut self, _source: &TestSource) -> Result<TestTexture, TestImportError> {
        if self.fail_imports {
            return Err(TestImportError);
        }
        self.imports += 1;
        Ok(TestTexture(self.imports))
    }

    fn update_texture(
        &mut self,
        _texture: &TestTexture,
        _source: &TestSource,
        damage: &[Rectangle<i32, BufferCoords>],
    ) -> Result<(), TestImportError> {
        if self.fail_updates {
            return Err(TestImportError);
        }
        self.updates.push(damage.to_vec());
        Ok(())
    }
}

#[test]
fn first_access_imports_once() {
    let mut importer = TestImporter::default();
    let mut buffer = Buffer::<TestImporter>::new(TestSource::shm(100, 100));
    assert_eq!(buffer.texture(), None);

    buffer.process_damage([rect(0, 0, 10, 10)]);
    assert_eq!(buffer.ensure_texture(&mut importer).unwrap(), &TestTexture(1));
    assert_eq!(buffer.ensure_texture(&mut importer).unwrap(), &TestTexture(1));

    assert_eq!(importer.imports, 1);
    assert!(importer.updates.is_empty());
    assert!(buffer.pending_damage().is_empty());
}

#[test]
fn shm_damage_updates_clipped_rects() {
    let mut importer = TestImporter::default();
    let mut buffer = Buffer::<TestImporter>::new(TestSource::shm(100, 100));
    buffer.ensure_texture(&mut importer).unwrap();

    buffer.process_damage([
        rect(90, 90, 20, 20),
        rect(200, 200, 5, 5),
    ]);
    assert_eq!(buffer.ensure_texture(&mut importer).unwrap(), &TestTexture(1));
    assert_eq!(importer.updates, vec![vec![rect(90, 90, 10, 10)]]);

    buffer.ensure_texture(&mut importer).unwrap();
    assert_eq!(importer.updates.len(), 1);
    assert_eq!(importer.imports, 1);
}

#[test]
fn zero_copy_damage_needs_no_upload() {
    let mut importer = TestImporter::default();
    let mut buffer = Buffer::<TestImporter>::new(TestSource::dmabuf(64, 64));
    buffer.ensure_texture(&mut importer).unwrap();

    buffer.process_damage([rect(0, 0, 64, 64)]);
    buffer.ensure_texture(&mut importer).unwrap();
    assert!(importer.updates.is_empty());
    assert!(buffer.pending_damage().is_empty());
    assert_eq!(importer.imports, 1);
}

#[test]
fn failed_update_reimports() {
    let mut importer = TestImporter::default();
    let mut buffer = Buffer::<TestImporter>::new(TestSource::shm(100, 100));
    buffer.ensure_texture(&mut importer).unwrap();

    buffer.process_damage([rect(0, 0, 10, 10)]);
    importer.fail_updates = true;
    assert!(matches!(
        buffer.ensure_texture(&mut importer),
        Err(BufferError::Update(_))
    ));
    assert_eq!(buffer.texture(), None);
    assert!(!buffer.pending_damage().is_empty());

    importer.fail_updates = false;
    assert_eq!(buffer.ensure_texture(&mut importer).unwrap(), &TestTexture(2));
    assert!(buffer.pending_damage().is_empty());
}

#[test]
fn failed_import_is_reported() {
    let mut importer = TestImporter {
        fail_imports: true,
        ..Default::default()
    };
    let mut buffer = Buffer::<TestImporter>::new(TestSource::shm(10, 10));
    let err = buffer.ensure_texture(&mut importer).unwrap_err();
    assert_eq!(err.to_string(), "error importing buffer");
    assert_eq!(
        err.source().map(ToString::to_string),
        Some(String::from("test import error"))
    );
    assert_eq!(buffer.texture(), None);
}

#[test]
fn replacing_source_invalidates() {
    let mut importer = TestImporter::default();
    let mut buffer = Buffer::<TestImporter>::new(TestSource::shm(10, 10));
    buffer.ensure_texture(&mut importer).unwrap();

    buffer.replace_source(TestSource::shm(20, 20));
    assert_eq!(buffer.texture(), None);
    assert_eq!(buffer.ensure_texture(&mut importer).unwrap(), &TestTexture(2));
    assert_eq!(buffer.bounds(), rect(0, 0, 20, 20));

    buffer.destroy();
}

#[test]
fn damage_past_coordinate_range_is_clipped() {
    let mut importer = TestImporter::default();
    let mut buffer = Buffer::<TestImporter>::new(TestSource::shm(100, 100));
    buffer.ensure_texture(&mut importer).unwrap();

    buffer.process_damage([
        Rectangle::new((i32::MAX - 10, 0).into(), (100, 10).into()),
        Rectangle::new((i32::MIN, i32::MIN).into(), (i32::MAX, i32::MAX).into()),
        Rectangle::new((-10, 95).into(), (i32::MAX, i32::MAX).into()),
    ]);
    buffer.ensure_texture(&mut importer).unwrap();
    assert_eq!(importer.updates, vec![vec![rect(0, 95, 100, 5)]]);
}
