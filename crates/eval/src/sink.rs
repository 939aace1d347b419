//! Hand-off point to the cluster-creation collaborator.

use quickcluster_interchange::ClusterRequest;

/// Receives the finished cluster request. Fire-and-forget: whatever the
/// collaborator does with the request (transport, retries, result
/// handling) is its own concern.
pub trait SubmissionSink {
    fn submit(&mut self, request: ClusterRequest);
}

/// Collects requests in memory.
impl SubmissionSink for Vec<ClusterRequest> {
    fn submit(&mut self, request: ClusterRequest) {
        self.push(request);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(ClusterRequest)> SubmissionSink for FnSink<F> {
    fn submit(&mut self, request: ClusterRequest) {
        (self.0)(request)
    }
}
