//! Windows implementation of the image queries

use super::ImageInfo;
use crate::core::types::{Address, RelocError, RelocResult, VersionKey};
use std::mem;
use std::path::Path;
use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Foundation::MAX_PATH;
use windows::Win32::Storage::FileSystem::{
    GetFileVersionInfoSizeW, GetFileVersionInfoW, VerQueryValueW, VS_FIXEDFILEINFO,
};
use windows::Win32::System::LibraryLoader::{GetModuleFileNameW, GetModuleHandleW};
use windows::Win32::System::ProcessStatus::{K32GetModuleInformation, MODULEINFO};
use windows::Win32::System::Threading::GetCurrentProcess;

/// Reads base, mapped size, and the fixed-file-info version stamp of the
/// current executable image.
pub fn query_current_image() -> RelocResult<ImageInfo> {
    let module = unsafe { GetModuleHandleW(PCWSTR::null()) }
        .map_err(|e| RelocError::PlatformQuery(format!("GetModuleHandleW: {e}")))?;

    let mut info = MODULEINFO::default();
    let ok = unsafe {
        K32GetModuleInformation(
            GetCurrentProcess(),
            module,
            &mut info,
            mem::size_of::<MODULEINFO>() as u32,
        )
    };
    if !ok.as_bool() {
        return Err(RelocError::PlatformQuery(
            "K32GetModuleInformation failed".to_string(),
        ));
    }

    let mut path_buf = [0u16; MAX_PATH as usize];
    let len = unsafe { GetModuleFileNameW(module, &mut path_buf) } as usize;
    if len == 0 || len >= path_buf.len() {
        return Err(RelocError::PlatformQuery(
            "GetModuleFileNameW failed or truncated".to_string(),
        ));
    }
    let path = String::from_utf16_lossy(&path_buf[..len]);
    let name = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());

    let version = query_file_version(&path_buf[..=len])?;
    debug!(%name, %version, "queried host image");

    Ok(ImageInfo {
        name,
        base: Address::new(info.lpBaseOfDll as usize),
        size: info.SizeOfImage as usize,
        version,
    })
}

/// Extracts the VS_FIXEDFILEINFO version from the image's version resource.
///
/// `wide_path` must be NUL-terminated. Absence of the resource is fatal to
/// the caller: no offset entry can be selected without a version key.
fn query_file_version(wide_path: &[u16]) -> RelocResult<VersionKey> {
    let path = PCWSTR::from_raw(wide_path.as_ptr());

    let size = unsafe { GetFileVersionInfoSizeW(path, None) };
    if size == 0 {
        return Err(RelocError::version_unavailable(
            String::from_utf16_lossy(&wide_path[..wide_path.len().saturating_sub(1)]),
            "no version resource",
        ));
    }

    let mut data = vec![0u8; size as usize];
    unsafe { GetFileVersionInfoW(path, 0, size, data.as_mut_ptr() as *mut _) }.map_err(|e| {
        RelocError::version_unavailable(
            String::from_utf16_lossy(&wide_path[..wide_path.len().saturating_sub(1)]),
            format!("GetFileVersionInfoW: {e}"),
        )
    })?;

    let mut fixed: *mut VS_FIXEDFILEINFO = std::ptr::null_mut();
    let mut fixed_len = 0u32;
    let root: [u16; 2] = [b'\\' as u16, 0];
    let ok = unsafe {
        VerQueryValueW(
            data.as_ptr() as *const _,
            PCWSTR::from_raw(root.as_ptr()),
            &mut fixed as *mut _ as *mut *mut core::ffi::c_void,
            &mut fixed_len,
        )
    };
    if !ok.as_bool() || fixed.is_null() || (fixed_len as usize) < mem::size_of::<VS_FIXEDFILEINFO>()
    {
        return Err(RelocError::version_unavailable(
            String::from_utf16_lossy(&wide_path[..wide_path.len().saturating_sub(1)]),
            "version resource has no fixed file info",
        ));
    }

    let info = unsafe { *fixed };
    Ok(VersionKey::new(
        (info.dwFileVersionMS >> 16) as u16,
        info.dwFileVersionMS as u16,
        (info.dwFileVersionLS >> 16) as u16,
        info.dwFileVersionLS as u16,
    ))
}
