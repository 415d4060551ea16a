//! Live process attachment.
//!
//! On Windows the target is opened with `PROCESS_VM_READ` and read through
//! `ReadProcessMemory`. Other platforms can still build the library and use
//! any other [`ReadMemory`] implementation, but cannot attach.

use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// An opened target process
#[derive(Debug)]
pub struct ProcessHandle {
    pub pid: u32,
    /// Load address of the main module
    pub base_address: u64,
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
}

// SAFETY: the handle is only used for ReadProcessMemory, which is safe to call
// from any thread, and is closed exactly once in Drop.
#[cfg(target_os = "windows")]
unsafe impl Send for ProcessHandle {}
#[cfg(target_os = "windows")]
unsafe impl Sync for ProcessHandle {}

#[cfg(target_os = "windows")]
impl ProcessHandle {
    /// Find a running process by executable name and open it
    pub fn find_and_open(name: &str) -> Result<Self> {
        use windows::Win32::System::ProcessStatus::{EnumProcesses, GetModuleBaseNameW};
        use windows::Win32::System::Threading::{
            OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
        };

        let search_name = name.to_lowercase();
        let search_name_exe = format!("{}.exe", search_name);

        let mut pids = [0u32; 4096];
        let mut bytes_returned: u32 = 0;

        // SAFETY: the buffer size passed matches the array.
        unsafe {
            EnumProcesses(
                pids.as_mut_ptr(),
                (pids.len() * std::mem::size_of::<u32>()) as u32,
                &mut bytes_returned,
            )
        }
        .map_err(|e| Error::ProcessNotFound(format!("EnumProcesses failed: {}", e)))?;

        let count = bytes_returned as usize / std::mem::size_of::<u32>();

        for &pid in &pids[..count] {
            if pid == 0 {
                continue;
            }

            // SAFETY: the handle is closed before the next iteration.
            let Ok(process) =
                (unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) })
            else {
                continue;
            };

            let mut name_buf = [0u16; 260];
            // SAFETY: name_buf outlives the call.
            let len = unsafe { GetModuleBaseNameW(process, None, &mut name_buf) };
            // SAFETY: process was opened above.
            let _ = unsafe { windows::Win32::Foundation::CloseHandle(process) };

            if len > 0 {
                let proc_name = String::from_utf16_lossy(&name_buf[..len as usize]).to_lowercase();
                if proc_name == search_name || proc_name == search_name_exe {
                    debug!("Found process '{}' with PID {}", proc_name, pid);
                    return Self::open(pid);
                }
            }
        }

        Err(Error::ProcessNotFound(name.to_string()))
    }

    /// Open a process by PID
    pub fn open(pid: u32) -> Result<Self> {
        use windows::Win32::Foundation::{CloseHandle, HMODULE};
        use windows::Win32::System::ProcessStatus::{EnumProcessModulesEx, LIST_MODULES_ALL};
        use windows::Win32::System::Threading::{
            OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
        };

        // SAFETY: plain handle acquisition; failure is reported as an error.
        let handle = unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("PID {}: {}", pid, e)))?;

        let mut modules = [HMODULE::default(); 1];
        let mut needed = 0u32;

        // SAFETY: the first module of a process is its main executable.
        let result = unsafe {
            EnumProcessModulesEx(
                handle,
                modules.as_mut_ptr(),
                std::mem::size_of_val(&modules) as u32,
                &mut needed,
                LIST_MODULES_ALL,
            )
        };

        if let Err(e) = result {
            // SAFETY: handle was opened above and is not used afterwards.
            let _ = unsafe { CloseHandle(handle) };
            return Err(Error::ProcessOpenFailed(format!(
                "PID {}: EnumProcessModulesEx failed: {}",
                pid, e
            )));
        }

        Ok(Self {
            pid,
            base_address: modules[0].0 as u64,
            handle,
        })
    }

    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        use std::ffi::c_void;
        use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;

        let mut bytes_read = 0usize;
        // SAFETY: buf is valid for buf.len() bytes for the duration of the call.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const c_void,
                buf.as_mut_ptr() as *mut c_void,
                buf.len(),
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| Error::read_failed(address, e.to_string()))?;

        if bytes_read != buf.len() {
            return Err(Error::read_failed(
                address,
                format!("partial read: {} of {} bytes", bytes_read, buf.len()),
            ));
        }
        Ok(())
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: the handle is owned by this struct and closed once.
        let _ = unsafe { windows::Win32::Foundation::CloseHandle(self.handle) };
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    pub fn find_and_open(name: &str) -> Result<Self> {
        Err(Error::ProcessOpenFailed(format!(
            "attaching to '{}' is only supported on Windows",
            name
        )))
    }

    pub fn open(pid: u32) -> Result<Self> {
        Err(Error::ProcessOpenFailed(format!(
            "attaching to PID {} is only supported on Windows",
            pid
        )))
    }

    fn read_into(&self, address: u64, _buf: &mut [u8]) -> Result<()> {
        Err(Error::read_failed(address, "unsupported platform"))
    }
}

/// [`ReadMemory`] over an opened process
#[derive(Debug, Clone, Copy)]
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    pub fn process(&self) -> &'a ProcessHandle {
        self.process
    }
}

impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        if address == 0 {
            return Err(Error::read_failed(address, "null address"));
        }
        let mut buf = vec![0u8; size];
        self.process.read_into(address, &mut buf)?;
        Ok(buf)
    }
}
