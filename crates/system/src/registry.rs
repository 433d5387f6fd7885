//! Minimal `HKEY_CURRENT_USER` access for the theme and startup settings.

use runcat_core::{Result, RunCatError};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use windows::core::HSTRING;
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
    HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ,
};

/// An open registry key, closed on drop.
pub struct Key(HKEY);

impl Key {
    pub fn open_read(subkey: &str) -> Result<Self> {
        Self::open(subkey, KEY_QUERY_VALUE)
    }

    pub fn open_write(subkey: &str) -> Result<Self> {
        Self::open(subkey, KEY_QUERY_VALUE | KEY_SET_VALUE)
    }

    fn open(subkey: &str, access: REG_SAM_FLAGS) -> Result<Self> {
        let mut hkey = HKEY::default();
        // SAFETY: `hkey` outlives the call and receives the opened handle.
        unsafe { RegOpenKeyExW(HKEY_CURRENT_USER, &HSTRING::from(subkey), 0, access, &mut hkey) }
            .ok()
            .map_err(|e| RunCatError::System(format!("cannot open HKCU\\{subkey}: {e}")))?;
        Ok(Self(hkey))
    }

    /// Read a `REG_DWORD`; `None` if the value is absent.
    pub fn dword(&self, name: &str) -> Option<u32> {
        let mut data = 0u32;
        let mut size = std::mem::size_of::<u32>() as u32;
        // SAFETY: `data` is a writable u32 and `size` holds its byte length.
        unsafe {
            RegQueryValueExW(
                self.0,
                &HSTRING::from(name),
                None,
                None,
                Some(&mut data as *mut u32 as *mut u8),
                Some(&mut size),
            )
        }
        .ok()
        .ok()
        .map(|()| data)
    }

    pub fn has_value(&self, name: &str) -> bool {
        // SAFETY: a null data pointer only queries for existence.
        unsafe { RegQueryValueExW(self.0, &HSTRING::from(name), None, None, None, None) }.is_ok()
    }

    /// Store `path` as a `REG_SZ`.
    pub fn set_path(&self, name: &str, path: &Path) -> Result<()> {
        let wide: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
        let bytes: Vec<u8> = wide.iter().flat_map(|c| c.to_le_bytes()).collect();
        // SAFETY: `bytes` is a NUL-terminated UTF-16LE string.
        unsafe { RegSetValueExW(self.0, &HSTRING::from(name), 0, REG_SZ, Some(&bytes)) }
            .ok()
            .map_err(|e| RunCatError::System(format!("cannot set '{name}': {e}")))
    }

    /// Delete a value.  A value that doesn't exist is not an error.
    pub fn delete(&self, name: &str) -> Result<()> {
        // SAFETY: the key handle is open for the lifetime of `self`.
        let status = unsafe { RegDeleteValueW(self.0, &HSTRING::from(name)) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        status
            .ok()
            .map_err(|e| RunCatError::System(format!("cannot delete '{name}': {e}")))
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        // SAFETY: we own this handle.
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}
