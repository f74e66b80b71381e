//! Loading of rom files into a memory ready representation.

use std::{fs, path::Path};

use crate::{
    definitions::{cpu, memory},
    error::RomError,
};

/// The amount of bytes a rom may occupy behind the program start address.
pub const MAX_ROM_SIZE: usize = memory::SIZE - cpu::PROGRAM_START as usize;

#[derive(Clone)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw content data of the rom file
    /// stored as a u8 slice on the heap
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data.
    ///
    /// Data that does not fit into the program memory region is
    /// rejected here, so that a constructed rom can always be copied
    /// to `0x200` verbatim.
    pub fn new(name: &str, data: Box<[u8]>) -> Result<Self, RomError> {
        if data.len() > MAX_ROM_SIZE {
            return Err(RomError::TooLarge {
                size: data.len(),
                max: MAX_ROM_SIZE,
            });
        }
        Ok(Rom {
            name: name.to_string(),
            data,
        })
    }

    /// Will read the rom from the given file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = fs::read(path)?.into_boxed_slice();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(&name, data)
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}
