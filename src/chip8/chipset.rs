//! The main chip8 implementation module.
//! The given implementation is based primarily on the [wikipedia
//! page](https://en.wikipedia.org/wiki/CHIP-8) definitions.

use parking_lot::{RwLock, RwLockReadGuard};
use rand::RngCore;
use std::sync::Arc;
use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display, memory},
    devices::Keypad,
    error::{ProcessError, StackError},
    opcode::{decode, Instruction, Opcode},
    resources::Rom,
};

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// - `0x000-0x1FF` - Chip 8 interpreter (contains font set in emu)
    /// - `0x050-0x0A0` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles
    /// as a flag for some instructions; thus, it should be avoided. In an
    /// addition operation, `VF` is the carry flag, while in subtraction, it
    /// is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The program counter is a CPU register in the computer processor which
    /// has the address of the next instruction to be executed from memory.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are
    /// called. The original [RCA 1802](https://de.wikipedia.org/wiki/RCA1802)
    /// version allocated `48` bytes for up to `12` levels of nesting; modern
    /// implementations usually have more.
    /// (here we are using `16`)
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events
    /// of games. Its value can be set and read.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) delay_timer: u8,
    /// Sound timer: This timer is used for sound effects. When its value is
    /// nonzero, a beeping sound would be made; this interpreter only ticks
    /// it.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) sound_timer: u8,
    /// The graphics of the Chip 8 are black and white and the screen has a
    /// total of `2048` pixels `(64 x 32)`, stored row major as bools.
    pub(super) display: Vec<Vec<bool>>,
    /// Input is done with a hex keyboard that has 16 keys ranging `0-F`.
    /// Three opcodes are used to detect input. One skips an instruction if a
    /// specific key is pressed, while another does the same if a specific
    /// key is not pressed. The third waits for a key press, and then stores
    /// it in one of the data registers. The latch itself is owned by the
    /// input worker, the chipset only ever reads it.
    pub(super) keypad: Arc<RwLock<Keypad>>,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl ChipSet {
    /// will create a new chipset object with its own keypad
    pub fn new(rom: Rom) -> Self {
        Self::with_keypad(rom, Arc::new(RwLock::new(Keypad::new())))
    }

    /// Creates a new chipset that reads key state from an external keypad.
    pub fn with_keypad(rom: Rom, keypad: Arc<RwLock<Keypad>>) -> Self {
        // initialize all the memory with 0

        let mut ram = vec![0; memory::SIZE];

        // load fonts
        ram[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        // write the rom data into memory
        let data = rom.get_data();
        let start = cpu::PROGRAM_START as usize;
        ram[start..(start + data.len())].copy_from_slice(data);

        Self {
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_START,
            stack: ArrayVec::new(),
            delay_timer: 0,
            sound_timer: 0,
            display: vec![vec![false; display::WIDTH]; display::HEIGHT],
            keypad,
            rng: Box::new(rand::rngs::OsRng {}),
        }
    }

    /// will advance the program by a single fetch, decode and execute cycle
    pub fn step(&mut self) -> Result<(), ProcessError> {
        let pc = self.program_counter;
        let opcode = self.fetch()?;
        match decode(opcode) {
            Instruction::Unknown(opcode) => Err(ProcessError::UnknownOpcode { opcode, pc }),
            instruction => self.execute(instruction),
        }
    }

    /// Will read the two opcode bytes at the program counter and move the
    /// counter past them.
    ///
    /// Control flow instructions overwrite the counter afterwards, so a
    /// plain instruction falls through to the next opcode on its own.
    pub(super) fn fetch(&mut self) -> Result<Opcode, ProcessError> {
        let pc = self.program_counter as usize;
        if pc + 1 >= memory::SIZE {
            return Err(ProcessError::OutOfBounds {
                pc: self.program_counter,
                address: pc,
            });
        }
        let opcode = Opcode::from_be_bytes([self.memory[pc], self.memory[pc + 1]]);
        self.program_counter += memory::opcodes::SIZE as u16;
        Ok(opcode)
    }

    /// Decrements both countdown timers while they are positive.
    /// Has to be called once per frame to approximate the 60Hz cadence.
    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    /// Will return a immutable slice of the current display configuration
    pub fn get_display(&self) -> &[Vec<bool>] {
        &self.display[..]
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub(super) fn get_keypad_read(&self) -> RwLockReadGuard<Keypad> {
        self.keypad.read()
    }

    /// Will push the current pointer to the stack
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        if self.stack.len() == self.stack.capacity() {
            Err(StackError::Full)
        } else {
            // push to stack
            self.stack.push(pointer);
            Ok(())
        }
    }

    /// Will pop from the counter
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    /// Validates that the `count` bytes behind `address` lie inside of the
    /// ram, so that the handlers never index past it.
    pub(super) fn check_range(&self, address: usize, count: usize) -> Result<(), ProcessError> {
        if address + count > memory::SIZE {
            Err(ProcessError::OutOfBounds {
                pc: self.program_counter,
                address,
            })
        } else {
            Ok(())
        }
    }

    /// Moves the program counter past the next opcode if the condition
    /// holds.
    pub(super) fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter += memory::opcodes::SIZE as u16;
        }
    }
}
