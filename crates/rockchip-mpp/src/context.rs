use crate::bindings::*;
use crate::error::{MppError, MppResult};
use std::ptr;

#[derive(Debug)]
pub struct MppContext {
    ctx: MppCtx,
    api: *mut MppApi_t,
}

impl MppContext {
    pub fn new(ctx_type: MppCtxType, coding_type: MppCodingType) -> MppResult<Self> {
        let mut ctx = ptr::null_mut();
        let mut api = ptr::null_mut();

        unsafe {
            let ret = mpp_create(&mut ctx, &mut api);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }

            let ret = mpp_init(ctx, ctx_type, coding_type);
            if ret != 0 {
                mpp_destroy(ctx);
                return Err(MppError::MppError(ret));
            }
        }

        Ok(MppContext { ctx, api })
    }

    pub fn control(&self, cmd: MpiCmd, param: MppParam) -> MppResult<()> {
        unsafe {
            let control_fn = (*self.api).control;
            if control_fn.is_none() {
                return Err(MppError::NotSupported);
            }
            let ret = control_fn.unwrap()(self.ctx, cmd, param);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
            Ok(())
        }
    }

    pub fn reset(&self) -> MppResult<()> {
        unsafe {
            let reset_fn = (*self.api).reset;
            if reset_fn.is_none() {
                return Err(MppError::NotSupported);
            }
            let ret = reset_fn.unwrap()(self.ctx);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
            Ok(())
        }
    }

    // --- Dual-port task queue (decode) ---
    //
    // A decode is: poll the input port, dequeue an input task, attach the
    // packet and frame descriptors, enqueue it back to the input port, poll
    // the output port (this is where the hardware decode latency lands),
    // dequeue the completed output task, read the frame, then enqueue the
    // task back to the output port to return it to MPP's pool.

    pub fn poll_input_port(&self, poll: PortPoll) -> MppResult<()> {
        self.poll(MPP_PORT_INPUT, poll)
    }

    pub fn poll_output_port(&self, poll: PortPoll) -> MppResult<()> {
        self.poll(MPP_PORT_OUTPUT, poll)
    }

    fn poll(&self, port: MppPortType, poll: PortPoll) -> MppResult<()> {
        unsafe {
            let poll_fn = (*self.api).poll;
            if poll_fn.is_none() {
                return Err(MppError::NotSupported);
            }
            let ret = poll_fn.unwrap()(self.ctx, port, poll.into());
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
            Ok(())
        }
    }

    pub fn dequeue_input_task(&self) -> MppResult<crate::task::MppTask> {
        self.dequeue(MPP_PORT_INPUT)
    }

    pub fn dequeue_output_task(&self) -> MppResult<crate::task::MppTask> {
        self.dequeue(MPP_PORT_OUTPUT)
    }

    fn dequeue(&self, port: MppPortType) -> MppResult<crate::task::MppTask> {
        unsafe {
            let dequeue_fn = (*self.api).dequeue;
            if dequeue_fn.is_none() {
                return Err(MppError::NotSupported);
            }
            let mut task = ptr::null_mut();
            let ret = dequeue_fn.unwrap()(self.ctx, port, &mut task);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
            if task.is_null() {
                return Err(MppError::Unknown("dequeue returned no task".to_string()));
            }
            Ok(crate::task::MppTask::from_ptr(task))
        }
    }

    pub fn enqueue_input_task(&self, task: crate::task::MppTask) -> MppResult<()> {
        self.enqueue(MPP_PORT_INPUT, task)
    }

    pub fn enqueue_output_task(&self, task: crate::task::MppTask) -> MppResult<()> {
        self.enqueue(MPP_PORT_OUTPUT, task)
    }

    fn enqueue(&self, port: MppPortType, task: crate::task::MppTask) -> MppResult<()> {
        unsafe {
            let enqueue_fn = (*self.api).enqueue;
            if enqueue_fn.is_none() {
                return Err(MppError::NotSupported);
            }
            // MPP takes ownership of the task pointer on enqueue; forget the
            // wrapper so its Drop impl does not also call mpp_task_deinit.
            let ret = enqueue_fn.unwrap()(self.ctx, port, task.as_ptr());
            std::mem::forget(task);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
            Ok(())
        }
    }
}

/// Polling mode for [`MppContext::poll_input_port`] / [`poll_output_port`](MppContext::poll_output_port).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortPoll {
    NonBlock,
    Block,
}

impl From<PortPoll> for MppPollType {
    fn from(poll: PortPoll) -> Self {
        match poll {
            PortPoll::NonBlock => MPP_POLL_NON_BLOCK,
            PortPoll::Block => MPP_POLL_BLOCK,
        }
    }
}

impl Drop for MppContext {
    fn drop(&mut self) {
        unsafe {
            mpp_destroy(self.ctx);
        }
    }
}

// 重新导出类型
pub use crate::bindings::{MpiCmd, MppApi_t, MppCodingType, MppCtx, MppCtxType, MppParam};
